//! Data models layered over the record store
//!
//! The store is schema-less; typed field access lives here, at the handler
//! boundary.

pub mod task;
pub mod user;

pub use task::TaskModel;
pub use user::{UserFields, UserModel};

use serde_json::Value;

use crate::store::Record;

/// String field, defaulting to the empty string
pub fn str_field<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Unsigned integer field
pub fn u64_field(record: &Record, key: &str) -> Option<u64> {
    record.get(key).and_then(Value::as_u64)
}

/// Signed integer field, defaulting to zero
pub fn i64_field(record: &Record, key: &str) -> i64 {
    record.get(key).and_then(Value::as_i64).unwrap_or(0)
}
