//! Isolated network and its endpoints
//!
//! Two availability-zone slots, one public and one isolated `/24` subnet tier
//! per zone. Service containers have no internet egress, so every platform
//! service they talk to (object storage, image registry, orchestration
//! control plane, log delivery, secret retrieval) gets a network endpoint.

use crate::config::ResolvedNames;
use crate::error::Result;
use crate::security::SecurityGroupHandle;
use airlift_plan::{DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

pub const NETWORK_CIDR: &str = "10.0.0.0/16";
pub const AVAILABILITY_ZONE_SLOTS: usize = 2;
const SUBNET_PREFIX_LEN: u8 = 24;

/// Subnet tier within the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetTier {
    /// Routable from the internet (load balancer only)
    Public,
    /// No egress; reachable only inside the network
    Isolated,
}

impl std::fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnetTier::Public => write!(f, "public"),
            SubnetTier::Isolated => write!(f, "isolated"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetSpec {
    pub id: String,
    pub tier: SubnetTier,
    pub availability_zone: String,
    pub cidr: String,
    /// Human-readable Name tag: `{tier}-subnet-{zone}-airflow`
    pub name_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub cidr: String,
    pub enable_dns_hostnames: bool,
    pub enable_dns_support: bool,
    pub subnets: Vec<SubnetSpec>,
}

/// Handle to the planned network
#[derive(Debug, Clone)]
pub struct NetworkHandle {
    pub id: String,
    pub name: String,
    pub cidr: String,
    pub availability_zones: Vec<String>,
    pub public_subnet_ids: Vec<String>,
    pub isolated_subnet_ids: Vec<String>,
}

/// Carve the n-th `/24` out of the `/16` address space
fn subnet_cidr(index: usize) -> String {
    format!("10.0.{index}.0/{SUBNET_PREFIX_LEN}")
}

/// Step 2: create the isolated network
pub fn plan_network(plan: &mut DeploymentPlan, names: &ResolvedNames) -> Result<NetworkHandle> {
    let availability_zones: Vec<String> = (1..=AVAILABILITY_ZONE_SLOTS)
        .map(|n| format!("az{n}"))
        .collect();

    let mut subnets = Vec::new();
    let mut public_subnet_ids = Vec::new();
    let mut isolated_subnet_ids = Vec::new();

    for (tier_index, tier) in [SubnetTier::Public, SubnetTier::Isolated]
        .into_iter()
        .enumerate()
    {
        for (zone_index, zone) in availability_zones.iter().enumerate() {
            let id = format!("{}-{}-{}", names.network, tier, zone);
            match tier {
                SubnetTier::Public => public_subnet_ids.push(id.clone()),
                SubnetTier::Isolated => isolated_subnet_ids.push(id.clone()),
            }
            subnets.push(SubnetSpec {
                id,
                tier,
                availability_zone: zone.clone(),
                cidr: subnet_cidr(tier_index * AVAILABILITY_ZONE_SLOTS + zone_index),
                name_tag: format!("{tier}-subnet-{zone}-airflow"),
            });
        }
    }

    let spec = NetworkSpec {
        name: names.network.clone(),
        cidr: NETWORK_CIDR.to_string(),
        enable_dns_hostnames: true,
        enable_dns_support: true,
        subnets,
    };
    plan.add(PlannedResource::new("network", &names.network, &spec)?)?;

    Ok(NetworkHandle {
        id: names.network.clone(),
        name: names.network.clone(),
        cidr: NETWORK_CIDR.to_string(),
        availability_zones,
        public_subnet_ids,
        isolated_subnet_ids,
    })
}

/// Endpoint flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    /// Route-table entry; no network interface
    Gateway,
    /// Network interfaces in the given subnets with private DNS
    Interface,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub name: String,
    pub endpoint_type: EndpointType,
    /// Platform service the endpoint fronts
    pub service: String,
    pub network: String,
    pub subnet_ids: Vec<String>,
    pub private_dns: bool,
    pub security_group_ids: Vec<String>,
}

/// Step 4: create the network endpoints on the isolated subnets
pub fn plan_endpoints(
    plan: &mut DeploymentPlan,
    network: &NetworkHandle,
    endpoint_group: &SecurityGroupHandle,
) -> Result<()> {
    let gateway = [("s3-endpoint", "s3")];
    let interface = [
        ("ecr-endpoint", "ecr-api"),
        ("ecr-docker-endpoint", "ecr-docker"),
        ("ecs-endpoint", "ecs"),
        ("cloudwatchlogs-endpoint", "cloudwatch-logs"),
        ("secrets-manager-endpoint", "secrets-manager"),
    ];

    for (name, service) in gateway {
        let spec = EndpointSpec {
            name: name.to_string(),
            endpoint_type: EndpointType::Gateway,
            service: service.to_string(),
            network: network.id.clone(),
            subnet_ids: network.isolated_subnet_ids.clone(),
            private_dns: false,
            security_group_ids: Vec::new(),
        };
        plan.add(PlannedResource::new("endpoint", name, &spec)?)?;
    }

    for (name, service) in interface {
        let spec = EndpointSpec {
            name: name.to_string(),
            endpoint_type: EndpointType::Interface,
            service: service.to_string(),
            network: network.id.clone(),
            subnet_ids: network.isolated_subnet_ids.clone(),
            private_dns: true,
            security_group_ids: vec![endpoint_group.id.clone()],
        };
        plan.add(PlannedResource::new("endpoint", name, &spec)?)?;
    }

    Ok(())
}
