//! Security groups
//!
//! Four logical groups: service (inter-service traffic and inbound to the web
//! front end), network-endpoint, cache, and database. The database and cache
//! groups accept inbound only from the service group; the endpoint group
//! accepts inbound only from the network CIDR.

use crate::cache::CACHE_PORT;
use crate::database::DATABASE_PORT;
use crate::error::Result;
use crate::network::NetworkHandle;
use crate::services::WEBSERVER_PORT;
use airlift_plan::{DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

pub const ENDPOINT_PORT: u16 = 443;

/// Source of an allow rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Peer {
    /// Traffic from members of another (or the same) security group
    SecurityGroup(String),
    /// Traffic from an address range
    Cidr(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressRule {
    pub peer: Peer,
    pub protocol: String,
    pub port: u16,
    pub description: String,
}

impl IngressRule {
    fn tcp(peer: Peer, port: u16, description: &str) -> Self {
        Self {
            peer,
            protocol: "tcp".to_string(),
            port,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupSpec {
    pub name: String,
    pub network: String,
    pub ingress: Vec<IngressRule>,
}

#[derive(Debug, Clone)]
pub struct SecurityGroupHandle {
    pub id: String,
    pub name: String,
}

/// Handles to the four groups
#[derive(Debug, Clone)]
pub struct SecurityGroupSet {
    pub service: SecurityGroupHandle,
    pub endpoint: SecurityGroupHandle,
    pub cache: SecurityGroupHandle,
    pub database: SecurityGroupHandle,
}

const SERVICE_GROUP: &str = "airflow-service-sg";
const ENDPOINT_GROUP: &str = "vpcendpoint-sg";
const CACHE_GROUP: &str = "airflow-redis-sg";
const DATABASE_GROUP: &str = "airflow-database-sg";

fn add_group(
    plan: &mut DeploymentPlan,
    network: &NetworkHandle,
    name: &str,
    ingress: Vec<IngressRule>,
) -> Result<SecurityGroupHandle> {
    let spec = SecurityGroupSpec {
        name: name.to_string(),
        network: network.id.clone(),
        ingress,
    };
    plan.add(PlannedResource::new("security-group", name, &spec)?)?;
    Ok(SecurityGroupHandle {
        id: name.to_string(),
        name: name.to_string(),
    })
}

/// Step 3: create the four security groups before anything that references them
pub fn plan_security_groups(
    plan: &mut DeploymentPlan,
    network: &NetworkHandle,
) -> Result<SecurityGroupSet> {
    let service = add_group(
        plan,
        network,
        SERVICE_GROUP,
        vec![IngressRule::tcp(
            Peer::SecurityGroup(SERVICE_GROUP.to_string()),
            WEBSERVER_PORT,
            "Allow scheduler and worker to reach the webserver",
        )],
    )?;

    let endpoint = add_group(
        plan,
        network,
        ENDPOINT_GROUP,
        vec![IngressRule::tcp(
            Peer::Cidr(network.cidr.clone()),
            ENDPOINT_PORT,
            "Allow services in the network to reach the endpoints",
        )],
    )?;

    let cache = add_group(
        plan,
        network,
        CACHE_GROUP,
        vec![IngressRule::tcp(
            Peer::SecurityGroup(SERVICE_GROUP.to_string()),
            CACHE_PORT,
            "Allow services to reach the cache",
        )],
    )?;

    let database = add_group(
        plan,
        network,
        DATABASE_GROUP,
        vec![IngressRule::tcp(
            Peer::SecurityGroup(SERVICE_GROUP.to_string()),
            DATABASE_PORT,
            "Allow services to reach the database",
        )],
    )?;

    Ok(SecurityGroupSet {
        service,
        endpoint,
        cache,
        database,
    })
}
