//! Airlift topology builder
//!
//! Builds the "Airflow-on-containers" deployment topology: an isolated
//! network, four security groups, platform-service endpoints, an artifact
//! bucket, a generated credential secret, a relational database, a cache
//! cluster, a container cluster, workload identities, log groups, and three
//! container services (web front end behind a load balancer, scheduler,
//! worker).
//!
//! The builder is a pure transformation from [`TopologyConfig`] to a
//! [`Topology`]: an ordered [`airlift_plan::DeploymentPlan`] plus typed
//! handles into it. No network calls happen here; executing the plan is the
//! deployment engine's job.

pub mod builder;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod logs;
pub mod network;
pub mod secrets;
pub mod security;
pub mod services;
pub mod storage;

// Re-exports
pub use builder::{Topology, TopologyBuilder, TopologyHandles};
pub use config::{ResolvedNames, TopologyConfig};
pub use error::{Result, TopologyError};
