//! Airlift deployment plan primitives
//!
//! A deployment plan is an ordered list of resource specifications plus a set
//! of exported outputs. The plan is a pure value: building it performs no
//! network calls, and executing it against a live account is the job of an
//! external deployment engine.
//!
//! Attributes that only exist after deployment (database endpoints, secret
//! ARNs) are carried as [`AttrRef`] tokens of the form `${id#attribute}`,
//! which the deployment engine substitutes once the resource is live.

pub mod error;
pub mod plan;
pub mod reference;

// Re-exports
pub use error::{PlanError, Result};
pub use plan::{DeploymentPlan, PlanOutput, PlanSummary, PlannedResource};
pub use reference::AttrRef;
