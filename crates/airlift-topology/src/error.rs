//! Topology builder error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Plan error: {0}")]
    Plan(#[from] airlift_plan::PlanError),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
