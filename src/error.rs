//! Error types for graph queries
//!
//! `StoreError` covers the outbound call to the graph store; `QueryError`
//! covers everything the query layer itself can reject or fail to decode.

/// Failure of the outbound call to the graph store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    #[error("Graph store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Graph query failed: {0}")]
    Query(String),

    #[error("Malformed graph store reply: {0}")]
    Malformed(String),
}

/// Errors produced while building, running or decoding a query
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to decode graph reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid target '{0}': a single named resource is required")]
    InvalidTarget(String),

    #[error("{0} has no hierarchy to traverse")]
    UnsupportedHierarchy(&'static str),

    #[error("Unsafe value {value:?}: {reason}")]
    UnsafeValue { value: String, reason: &'static str },

    #[error("Invalid label selector '{0}': expected key=value[,key=value]")]
    InvalidSelector(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
