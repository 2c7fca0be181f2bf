//! Container cluster and the three Airflow services
//!
//! All three services share one contract: same fernet key, same database
//! coordinates, same bucket, same credential secret, queue-backed executor.
//! The web front end additionally sits behind a load balancer and registers a
//! private service-discovery name so the scheduler and worker can reach it.

use crate::cache::CacheHandle;
use crate::config::ResolvedNames;
use crate::database::DatabaseHandle;
use crate::error::Result;
use crate::identity::Identities;
use crate::logs::{LogGroupHandle, LogGroups};
use crate::network::NetworkHandle;
use crate::secrets::SecretHandle;
use crate::security::SecurityGroupHandle;
use crate::storage::BucketHandle;
use airlift_plan::{DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const WEBSERVER_PORT: u16 = 8080;
/// Workers expose their task logs on this port
pub const WORKER_LOG_PORT: u16 = 8793;
pub const HEALTH_CHECK_PATH: &str = "/health";

/// Queue-backed distributed executor mode
const EXECUTOR: &str = "CeleryExecutor";
/// How often the scheduler re-scans the DAG directory, in seconds
const DAG_SCAN_INTERVAL: &str = "30";
const DISCOVERY_NAMESPACE: &str = "airflow";
const WEBSERVER_DISCOVERY_NAME: &str = "webserver";
const LOG_STREAM_PREFIX: &str = "ecs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub name: String,
    pub network: String,
    pub container_insights: bool,
}

#[derive(Debug, Clone)]
pub struct ClusterHandle {
    pub id: String,
    pub name: String,
}

/// Step 9: create the container cluster scoped to the network
pub fn plan_cluster(
    plan: &mut DeploymentPlan,
    names: &ResolvedNames,
    network: &NetworkHandle,
) -> Result<ClusterHandle> {
    let spec = ClusterSpec {
        name: names.cluster.clone(),
        network: network.id.clone(),
        container_insights: true,
    };
    plan.add(PlannedResource::new("cluster", &names.cluster, &spec)?)?;

    Ok(ClusterHandle {
        id: names.cluster.clone(),
        name: names.cluster.clone(),
    })
}

/// Environment variable sourced from a secret field, injected at launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretValueRef {
    pub secret: String,
    pub json_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub log_group: String,
    pub stream_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Directory the container image is built from
    pub image_asset: String,
    pub environment: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, SecretValueRef>,
    pub port_mappings: Vec<u16>,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub family: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub execution_identity: String,
    pub task_identity: String,
    pub container: ContainerSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckSpec {
    pub path: String,
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerSpec {
    pub name: String,
    pub container_port: u16,
    pub health_check: HealthCheckSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDiscoverySpec {
    pub namespace: String,
    pub record_name: String,
    pub record_type: String,
    pub dns_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub cluster: String,
    pub task: TaskSpec,
    pub desired_count: u32,
    pub security_group_ids: Vec<String>,
    pub load_balancer: Option<LoadBalancerSpec>,
    pub service_discovery: Option<ServiceDiscoverySpec>,
}

#[derive(Debug, Clone)]
pub struct ServiceHandle {
    pub id: String,
    pub name: String,
}

/// Handles every service planner needs
pub struct ServiceContext<'a> {
    pub fernet_key: &'a str,
    pub cluster: &'a ClusterHandle,
    pub bucket: &'a BucketHandle,
    pub secret: &'a SecretHandle,
    pub database: &'a DatabaseHandle,
    pub cache: &'a CacheHandle,
    pub service_group: &'a SecurityGroupHandle,
    pub identities: &'a Identities,
    pub log_groups: &'a LogGroups,
}

impl ServiceContext<'_> {
    /// Environment shared by all three services
    fn base_environment(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "AIRFLOW_FERNET_KEY".to_string(),
                self.fernet_key.to_string(),
            ),
            (
                "AIRFLOW_DATABASE_NAME".to_string(),
                self.database.database_name.clone(),
            ),
            (
                "AIRFLOW_DATABASE_PORT_NUMBER".to_string(),
                self.database.port.to_string(),
            ),
            (
                "AIRFLOW_DATABASE_HOST".to_string(),
                self.database.endpoint_address().token(),
            ),
            ("AIRFLOW_EXECUTOR".to_string(), EXECUTOR.to_string()),
            ("AIRFLOW_LOAD_EXAMPLES".to_string(), "no".to_string()),
            (
                "AIRFLOW__SCHEDULER__DAG_DIR_LIST_INTERVAL".to_string(),
                DAG_SCAN_INTERVAL.to_string(),
            ),
            ("BUCKET_NAME".to_string(), self.bucket.name.clone()),
        ])
    }

    /// Extra environment for the peer services: cache endpoint and the
    /// webserver's discovery hostname
    fn peer_environment(&self) -> BTreeMap<String, String> {
        let mut environment = self.base_environment();
        environment.insert(
            "AIRFLOW_WEBSERVER_HOST".to_string(),
            format!("{WEBSERVER_DISCOVERY_NAME}.{DISCOVERY_NAMESPACE}"),
        );
        environment.insert(
            "REDIS_HOST".to_string(),
            self.cache.endpoint_address().token(),
        );
        environment
    }

    fn database_secrets(&self) -> BTreeMap<String, SecretValueRef> {
        BTreeMap::from([
            (
                "AIRFLOW_DATABASE_USERNAME".to_string(),
                SecretValueRef {
                    secret: self.secret.id.clone(),
                    json_key: "username".to_string(),
                },
            ),
            (
                "AIRFLOW_DATABASE_PASSWORD".to_string(),
                SecretValueRef {
                    secret: self.secret.id.clone(),
                    json_key: "password".to_string(),
                },
            ),
        ])
    }

    fn logging(&self, log_group: &LogGroupHandle) -> LogConfig {
        LogConfig {
            log_group: log_group.id.clone(),
            stream_prefix: LOG_STREAM_PREFIX.to_string(),
        }
    }

    fn service(
        &self,
        name: &str,
        cpu: u32,
        memory_mib: u32,
        container: ContainerSpec,
    ) -> ServiceSpec {
        ServiceSpec {
            name: name.to_string(),
            cluster: self.cluster.id.clone(),
            task: TaskSpec {
                family: name.to_string(),
                cpu,
                memory_mib,
                execution_identity: self.identities.execution.id.clone(),
                task_identity: self.identities.task.id.clone(),
                container,
            },
            desired_count: 1,
            security_group_ids: vec![self.service_group.id.clone()],
            load_balancer: None,
            service_discovery: None,
        }
    }
}

fn add_service(plan: &mut DeploymentPlan, spec: ServiceSpec) -> Result<ServiceHandle> {
    let handle = ServiceHandle {
        id: spec.name.clone(),
        name: spec.name.clone(),
    };
    plan.add(PlannedResource::new("service", &spec.name, &spec)?)?;
    Ok(handle)
}

/// Step 12: web front end behind the load balancer, discoverable by name
pub fn plan_webserver_service(
    plan: &mut DeploymentPlan,
    ctx: &ServiceContext<'_>,
) -> Result<ServiceHandle> {
    let container = ContainerSpec {
        image_asset: "docker-images/airflow-webserver".to_string(),
        environment: ctx.base_environment(),
        secrets: ctx.database_secrets(),
        port_mappings: vec![WEBSERVER_PORT],
        logging: ctx.logging(&ctx.log_groups.webserver),
    };

    let mut spec = ctx.service("airflow-webserver", 512, 1024, container);
    spec.load_balancer = Some(LoadBalancerSpec {
        name: "airflow-webserver-lb".to_string(),
        container_port: WEBSERVER_PORT,
        health_check: HealthCheckSpec {
            path: HEALTH_CHECK_PATH.to_string(),
            interval_secs: 60,
            timeout_secs: 20,
        },
    });
    spec.service_discovery = Some(ServiceDiscoverySpec {
        namespace: DISCOVERY_NAMESPACE.to_string(),
        record_name: WEBSERVER_DISCOVERY_NAME.to_string(),
        record_type: "A".to_string(),
        dns_ttl_secs: 30,
    });

    add_service(plan, spec)
}

/// Step 13: scheduler, no inbound ports
pub fn plan_scheduler_service(
    plan: &mut DeploymentPlan,
    ctx: &ServiceContext<'_>,
) -> Result<ServiceHandle> {
    let container = ContainerSpec {
        image_asset: "docker-images/airflow-scheduler".to_string(),
        environment: ctx.peer_environment(),
        secrets: ctx.database_secrets(),
        port_mappings: Vec::new(),
        logging: ctx.logging(&ctx.log_groups.scheduler),
    };

    add_service(plan, ctx.service("airflow-scheduler", 512, 2048, container))
}

/// Step 14: worker, the heaviest workload, exposing its log port
pub fn plan_worker_service(
    plan: &mut DeploymentPlan,
    ctx: &ServiceContext<'_>,
) -> Result<ServiceHandle> {
    let container = ContainerSpec {
        image_asset: "docker-images/airflow-worker".to_string(),
        environment: ctx.peer_environment(),
        secrets: ctx.database_secrets(),
        port_mappings: vec![WORKER_LOG_PORT],
        logging: ctx.logging(&ctx.log_groups.worker),
    };

    add_service(plan, ctx.service("airflow-worker", 1024, 3072, container))
}
