//! Collapsing of multi-path duplicates
//!
//! A traversal can reach the same vertex along several edges; the reply then
//! lists it once per path. Identity is the vertex uid.

use std::collections::HashSet;

use crate::models::Pod;

/// Anything carrying a graph identifier
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Pod {
    fn id(&self) -> &str {
        &self.uid
    }
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }
}

/// Distinct identifiers in order of first occurrence
pub fn unique_ids<T: Identified>(items: &[T]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(Identified::id)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}
