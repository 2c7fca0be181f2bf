//! Staged topology assembly
//!
//! The build is an ordered pipeline of pure steps. Each step appends to the
//! accumulated [`DeploymentPlan`] and returns a typed handle; later steps only
//! read earlier handles, so the ordering dependencies are explicit. Any step
//! failure aborts the whole build — there is no partial-topology recovery.

use crate::cache::{self, CacheHandle};
use crate::config::{ResolvedNames, TopologyConfig};
use crate::database::{self, DatabaseHandle};
use crate::error::Result;
use crate::identity::{self, Identities};
use crate::logs::{self, LogGroups};
use crate::network::{self, NetworkHandle};
use crate::secrets::{self, SecretHandle};
use crate::security::{self, SecurityGroupSet};
use crate::services::{self, ClusterHandle, ServiceContext, ServiceHandle};
use crate::storage::{self, BucketHandle};
use airlift_plan::DeploymentPlan;

/// Typed handles to every resource of a built topology
#[derive(Debug, Clone)]
pub struct TopologyHandles {
    pub network: NetworkHandle,
    pub security_groups: SecurityGroupSet,
    pub bucket: BucketHandle,
    pub secret: SecretHandle,
    pub database: DatabaseHandle,
    pub cache: CacheHandle,
    pub cluster: ClusterHandle,
    pub identities: Identities,
    pub log_groups: LogGroups,
    pub webserver: ServiceHandle,
    pub scheduler: ServiceHandle,
    pub worker: ServiceHandle,
}

/// Result of a topology build: the plan plus handles into it
#[derive(Debug, Clone)]
pub struct Topology {
    pub plan: DeploymentPlan,
    pub handles: TopologyHandles,
}

pub struct TopologyBuilder;

impl TopologyBuilder {
    /// Assemble the complete deployment plan from a configuration
    pub fn build(config: &TopologyConfig) -> Result<Topology> {
        // Step 1: resolve identifiers; the fernet key is validated before any
        // resource is planned.
        let fernet_key = config.require_fernet_key()?;
        let names = ResolvedNames::resolve(config);
        tracing::debug!("Resolved names: {:?}", names);

        let mut plan = DeploymentPlan::new();

        // Steps 2-4: network, security groups, endpoints
        let network = network::plan_network(&mut plan, &names)?;
        let security_groups = security::plan_security_groups(&mut plan, &network)?;
        network::plan_endpoints(&mut plan, &network, &security_groups.endpoint)?;

        // Steps 5-8: bucket, secret, database, cache
        let bucket = storage::plan_bucket(&mut plan, &names)?;
        let secret = secrets::plan_database_secret(&mut plan)?;
        let database =
            database::plan_database(&mut plan, &names, &network, &secret, &security_groups.database)?;
        let cache = cache::plan_cache(&mut plan, &names, &network, &security_groups.cache)?;

        // Steps 9-11: cluster, identities, log groups
        let cluster = services::plan_cluster(&mut plan, &names, &network)?;
        let identities = identity::plan_identities(&mut plan, &bucket, &secret)?;
        let log_groups = logs::plan_log_groups(&mut plan, &identities.task)?;

        // Steps 12-14: the three services
        let ctx = ServiceContext {
            fernet_key,
            cluster: &cluster,
            bucket: &bucket,
            secret: &secret,
            database: &database,
            cache: &cache,
            service_group: &security_groups.service,
            identities: &identities,
            log_groups: &log_groups,
        };
        let webserver = services::plan_webserver_service(&mut plan, &ctx)?;
        let scheduler = services::plan_scheduler_service(&mut plan, &ctx)?;
        let worker = services::plan_worker_service(&mut plan, &ctx)?;

        tracing::info!("Topology plan complete: {}", plan.summary());

        Ok(Topology {
            plan,
            handles: TopologyHandles {
                network,
                security_groups,
                bucket,
                secret,
                database,
                cache,
                cluster,
                identities,
                log_groups,
                webserver,
                scheduler,
                worker,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TopologyError;

    #[test]
    fn test_build_requires_fernet_key() {
        let err = TopologyBuilder::build(&TopologyConfig::default()).unwrap_err();
        assert!(matches!(err, TopologyError::MissingCredential(_)));
    }

    #[test]
    fn test_build_order() {
        let topology =
            TopologyBuilder::build(&TopologyConfig::with_fernet_key("fkey")).unwrap();

        let types: Vec<&str> = topology
            .plan
            .resources
            .iter()
            .map(|r| r.resource_type.as_str())
            .collect();

        // Referenced resources always precede their dependents
        let pos = |t: &str| types.iter().position(|x| *x == t).unwrap();
        assert!(pos("network") < pos("security-group"));
        assert!(pos("security-group") < pos("endpoint"));
        assert!(pos("secret") < pos("database"));
        assert!(pos("identity") < pos("log-group"));
        assert!(pos("log-group") < pos("service"));
    }
}
