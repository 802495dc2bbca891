//! Label filter compiler
//!
//! Turns a mapping of label key to acceptable values into a boolean filter
//! over label vertices. A value in the set of its key is a match (OR within a
//! key) and every key given must match (AND across keys).
//!
//! An empty mapping, or a key with no acceptable values, compiles to a filter
//! that matches nothing. It never degrades to "match everything".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::QueryResult;
use crate::models::ResourceKind;
use crate::query::escape::quote;

/// Label key to the set of acceptable values
pub type LabelSet = BTreeMap<String, BTreeSet<String>>;

/// Compiled label filter
///
/// Holds one rendered clause per label key. No clauses means the filter
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    clauses: Vec<String>,
}

impl LabelFilter {
    /// Compile a label mapping into a filter
    ///
    /// Keys and values are quoted, so any string is accepted except those
    /// containing control characters.
    pub fn compile(labels: &LabelSet) -> QueryResult<Self> {
        if labels.is_empty() || labels.values().any(BTreeSet::is_empty) {
            return Ok(Self::match_nothing());
        }

        let clauses = labels
            .iter()
            .map(|(key, values)| key_clause(key, values))
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(Self { clauses })
    }

    /// A filter no label vertex satisfies
    pub fn match_nothing() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    pub fn matches_nothing(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Per-key clauses, each to be applied to label vertices on its own
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matches_nothing() {
            return write!(f, "NOT has({})", ResourceKind::Label.tag());
        }
        write!(f, "{}", self.clauses.join(" AND "))
    }
}

fn key_clause(key: &str, values: &BTreeSet<String>) -> QueryResult<String> {
    let key = quote(key)?;
    let alternatives = values
        .iter()
        .map(|value| Ok(format!("eq(value, {})", quote(value)?)))
        .collect::<QueryResult<Vec<_>>>()?;

    let values = if alternatives.len() == 1 {
        alternatives.concat()
    } else {
        format!("({})", alternatives.join(" OR "))
    };

    Ok(format!("(eq(key, {}) AND {})", key, values))
}
