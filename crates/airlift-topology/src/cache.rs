//! Cache cluster backing the queue-based executor

use crate::config::ResolvedNames;
use crate::error::Result;
use crate::network::NetworkHandle;
use crate::security::SecurityGroupHandle;
use airlift_plan::{AttrRef, DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

pub const CACHE_PORT: u16 = 6379;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSubnetGroupSpec {
    pub name: String,
    pub description: String,
    pub subnet_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSpec {
    pub cluster_name: String,
    pub engine: String,
    pub node_type: String,
    pub num_nodes: u32,
    pub port: u16,
    pub subnet_group: String,
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CacheHandle {
    pub id: String,
    pub cluster_name: String,
    pub port: u16,
}

impl CacheHandle {
    /// Endpoint address is assigned at deploy time
    pub fn endpoint_address(&self) -> AttrRef {
        AttrRef::new(&self.id, "endpoint-address")
    }
}

/// Step 8: create the single-node cache inside the isolated subnet group
pub fn plan_cache(
    plan: &mut DeploymentPlan,
    names: &ResolvedNames,
    network: &NetworkHandle,
    group: &SecurityGroupHandle,
) -> Result<CacheHandle> {
    let subnet_group_id = format!("{}-subnets", names.cache);
    let subnet_group = CacheSubnetGroupSpec {
        name: subnet_group_id.clone(),
        description: "Airflow cache isolated subnet group".to_string(),
        subnet_ids: network.isolated_subnet_ids.clone(),
    };
    plan.add(PlannedResource::new(
        "cache-subnet-group",
        &subnet_group_id,
        &subnet_group,
    )?)?;

    let spec = CacheSpec {
        cluster_name: names.cache.clone(),
        engine: "redis".to_string(),
        node_type: "cache.t2.small".to_string(),
        num_nodes: 1,
        port: CACHE_PORT,
        subnet_group: subnet_group_id,
        security_group_ids: vec![group.id.clone()],
    };
    plan.add(PlannedResource::new("cache", &names.cache, &spec)?)?;

    Ok(CacheHandle {
        id: names.cache.clone(),
        cluster_name: names.cache.clone(),
        port: CACHE_PORT,
    })
}
