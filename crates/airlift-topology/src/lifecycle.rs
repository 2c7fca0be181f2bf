//! Resource lifecycle policy
//!
//! The whole topology is disposable: every resource that supports a removal
//! policy is destroyed together with the topology rather than retained.

use serde::{Deserialize, Serialize};

/// What happens to a resource when the topology is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Delete the resource with the topology
    Destroy,
    /// Keep the resource after teardown
    Retain,
}
