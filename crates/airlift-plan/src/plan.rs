//! Deployment plan types
//!
//! A [`DeploymentPlan`] is the artifact of a topology build: an ordered list
//! of resources to create plus exported outputs. Order is significant — later
//! resources reference earlier ones — so the plan is a `Vec`, not a map.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single resource to be created by the deployment engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedResource {
    /// Resource type (e.g. "network", "security-group", "service")
    pub resource_type: String,

    /// Resource identifier, unique per type within a plan
    pub id: String,

    /// Resource-specific specification
    pub spec: serde_json::Value,
}

impl PlannedResource {
    pub fn new<T: Serialize>(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        spec: &T,
    ) -> Result<Self> {
        Ok(Self {
            resource_type: resource_type.into(),
            id: id.into(),
            spec: serde_json::to_value(spec)?,
        })
    }

    /// Get the full resource key (type:id)
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource_type, self.id)
    }

    /// Get a single spec field as a specific type
    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.spec
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Decode the whole spec back into a typed value
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.spec.clone()).map_err(|e| PlanError::InvalidSpec {
            id: self.id.clone(),
            message: e.to_string(),
        })
    }
}

/// Exported value of a plan, for cross-topology reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutput {
    /// Output name within the plan
    pub name: String,

    /// Resolved value
    pub value: String,

    /// Export name visible to other topologies
    pub export_name: String,

    /// Human-readable description
    pub description: String,
}

/// Ordered set of resources and outputs emitted by a topology build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentPlan {
    /// Resources in creation order
    pub resources: Vec<PlannedResource>,

    /// Exported outputs
    pub outputs: Vec<PlanOutput>,
}

impl DeploymentPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource to the plan
    ///
    /// Fails if a resource with the same type and id is already planned,
    /// since the deployment engine would reject the name collision anyway.
    pub fn add(&mut self, resource: PlannedResource) -> Result<()> {
        let key = resource.key();
        if self.resources.iter().any(|r| r.key() == key) {
            return Err(PlanError::DuplicateResource(key));
        }
        tracing::debug!("Planned resource {}", key);
        self.resources.push(resource);
        Ok(())
    }

    /// Export a value for cross-topology reference
    pub fn add_output(&mut self, output: PlanOutput) {
        tracing::debug!("Plan output {} = {}", output.export_name, output.value);
        self.outputs.push(output);
    }

    pub fn get(&self, resource_type: &str, id: &str) -> Option<&PlannedResource> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.id == id)
    }

    pub fn by_type(&self, resource_type: &str) -> Vec<&PlannedResource> {
        self.resources
            .iter()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Summary of the plan, grouped by resource type
    pub fn summary(&self) -> PlanSummary {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for resource in &self.resources {
            *counts.entry(resource.resource_type.clone()).or_default() += 1;
        }
        PlanSummary { counts }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Per-type resource counts for a plan
#[derive(Debug, Clone)]
pub struct PlanSummary {
    counts: BTreeMap<String, usize>,
}

impl PlanSummary {
    pub fn count(&self, resource_type: &str) -> usize {
        self.counts.get(resource_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &usize)> {
        self.counts.iter()
    }
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (resource_type, count) in &self.counts {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{count} {resource_type}")?;
            first = false;
        }
        Ok(())
    }
}
