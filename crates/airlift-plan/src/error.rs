//! Deployment plan error types

use thiserror::Error;

/// Errors raised while assembling a deployment plan
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Duplicate resource in plan: {0}")]
    DuplicateResource(String),

    #[error("Invalid spec for resource {id}: {message}")]
    InvalidSpec { id: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
