//! Core types shared by the retail map/reduce crates.

use serde::{Deserialize, Serialize};

pub type Score = f64;

/// An opaque identifier (country name, invoice number) paired with a numeric total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredItem {
    pub id: String,
    pub score: Score,
}

impl ScoredItem {
    pub fn new(id: impl Into<String>, score: Score) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// One stored key/value pair as handed to a map function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record {key:?}: {reason}")]
    MalformedRecord { key: String, reason: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    pub fn malformed(key: &str, reason: impl ToString) -> Self {
        CoreError::MalformedRecord {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub mod retail;
