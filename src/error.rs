//! Error Types
//!
//! Everything that can go wrong between a click and the server.

use thiserror::Error;

use crate::models::ChoreId;

/// Failures talking to the checklist API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("no browser window available")]
    NoWindow,
    #[error("network error: {0}")]
    Network(String),
    #[error("{path} returned HTTP {status}")]
    Status { status: u16, path: String },
    #[error("malformed response from {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Wrap a rejected JS promise or thrown exception
    pub fn network(err: wasm_bindgen::JsValue) -> Self {
        ApiError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("chore {0} not found")]
    NotFound(ChoreId),
    #[error("a completed chore needs a staff name")]
    MissingStaff,
}

/// Validation failures rejected before any optimistic change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Please select your name before ticking off chores.")]
    NoStaffSelected,
    #[error("Chore {0} is not part of this checklist.")]
    UnknownChore(ChoreId),
    #[error("Section \"{0}\" is not part of this checklist.")]
    UnknownSection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please choose a checklist first.")]
    NoChecklist,
    #[error("Please select your name before submitting.")]
    NoStaff,
    #[error("Please complete all tasks before submitting the checklist.")]
    Incomplete,
    #[error("Please sign before submitting.")]
    MissingSignature,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid checklist config: {0}")]
    Parse(#[from] serde_json::Error),
}
