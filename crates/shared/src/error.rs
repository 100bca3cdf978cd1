use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the catalog and interpreter routes, e.g. `{"error": "Recipe not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
