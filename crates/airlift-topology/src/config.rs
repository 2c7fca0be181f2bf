//! Topology configuration and name resolution

use crate::error::{Result, TopologyError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Range for the generated bucket-name suffix
///
/// The bucket name must be globally unique, so unset names get a random
/// numeric suffix. The range is large enough that repeated builds within one
/// process (integration tests build thousands of topologies) do not collide.
pub const BUCKET_SUFFIX_RANGE: u64 = 1_000_000_000_000;

/// Overrides for a topology build
///
/// Every name is optional; unset names fall back to fixed conventions, except
/// the bucket name which gets a random suffix for global uniqueness. The
/// fernet key has no default: an empty encryption key would silently disable
/// credential encryption inside the services, so the build refuses to proceed
/// without one.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Object-storage bucket for shared DAG/config artifacts
    pub bucket_name: Option<String>,

    /// Virtual network name
    pub network_name: Option<String>,

    /// Logical database name
    pub database_name: Option<String>,

    /// Cache cluster name
    pub cache_name: Option<String>,

    /// Container cluster name
    pub cluster_name: Option<String>,

    /// Fernet encryption key shared by all services (required)
    pub fernet_key: Option<String>,
}

impl TopologyConfig {
    pub fn with_fernet_key(key: impl Into<String>) -> Self {
        Self {
            fernet_key: Some(key.into()),
            ..Default::default()
        }
    }

    /// Return the fernet key, rejecting an absent or empty value
    pub fn require_fernet_key(&self) -> Result<&str> {
        match self.fernet_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(TopologyError::MissingCredential(
                "fernet key is not set".to_string(),
            )),
        }
    }
}

// The fernet key is secret material; keep it out of Debug output.
impl fmt::Debug for TopologyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologyConfig")
            .field("bucket_name", &self.bucket_name)
            .field("network_name", &self.network_name)
            .field("database_name", &self.database_name)
            .field("cache_name", &self.cache_name)
            .field("cluster_name", &self.cluster_name)
            .field(
                "fernet_key",
                &self.fernet_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Fully resolved resource names for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNames {
    pub bucket: String,
    pub network: String,
    pub database: String,
    pub cache: String,
    pub cluster: String,
}

impl ResolvedNames {
    /// Substitute defaults for every name the config leaves unset
    pub fn resolve(config: &TopologyConfig) -> Self {
        let bucket = config.bucket_name.clone().unwrap_or_else(|| {
            let suffix = rand::thread_rng().gen_range(0..BUCKET_SUFFIX_RANGE);
            format!("airflow-bucket-{suffix}")
        });

        Self {
            bucket,
            network: config
                .network_name
                .clone()
                .unwrap_or_else(|| "airflow-vpc".to_string()),
            database: config
                .database_name
                .clone()
                .unwrap_or_else(|| "airflowdb".to_string()),
            cache: config
                .cache_name
                .clone()
                .unwrap_or_else(|| "airflowredis".to_string()),
            cluster: config
                .cluster_name
                .clone()
                .unwrap_or_else(|| "AirflowECSCluster".to_string()),
        }
    }
}
