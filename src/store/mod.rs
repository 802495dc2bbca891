//! Graph store access
//!
//! The query layer only ever sends query text and receives the reply's `data`
//! object as raw JSON bytes. `GraphStore` is that seam; `DgraphStore` is the
//! HTTP implementation used outside of tests.

pub mod dgraph;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{QueryResult, StoreError};
use crate::query::decode;

pub use dgraph::DgraphStore;

/// Read-only access to the resource graph
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run one query and return the reply's `data` object as raw JSON
    async fn execute_raw(&self, query: &str) -> Result<Vec<u8>, StoreError>;
}

/// Run `query` and decode the reply into `T`
pub async fn execute_query<T: DeserializeOwned>(
    store: &dyn GraphStore,
    query: &str,
) -> QueryResult<T> {
    let raw = store.execute_raw(query).await?;
    decode(&raw)
}
