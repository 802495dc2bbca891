//! Quoting of caller-supplied strings for DQL
//!
//! Dgraph has no parameter binding for function arguments in the query text we
//! send, so every name, label key and label value is turned into a string
//! literal here before it reaches a filter clause. Quotes and backslashes are
//! escaped; control characters are rejected outright.

use crate::error::{QueryError, QueryResult};

/// Quote `value` as a DQL string literal
pub fn quote(value: &str) -> QueryResult<String> {
    if value.chars().any(char::is_control) {
        return Err(QueryError::UnsafeValue {
            value: value.to_string(),
            reason: "control characters are not allowed",
        });
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    Ok(quoted)
}
