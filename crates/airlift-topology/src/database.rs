//! Managed relational database for Airflow metadata

use crate::config::ResolvedNames;
use crate::error::Result;
use crate::lifecycle::RemovalPolicy;
use crate::network::NetworkHandle;
use crate::secrets::SecretHandle;
use crate::security::SecurityGroupHandle;
use airlift_plan::{AttrRef, DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

pub const DATABASE_PORT: u16 = 5432;
const DATABASE_ID: &str = "airflow-db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSpec {
    pub identifier: String,
    pub engine: String,
    pub engine_version: String,
    pub parameter_group: String,
    /// Smallest burstable tier; the topology is disposable
    pub instance_class: String,
    pub allocated_storage_gib: u32,
    pub database_name: String,
    pub port: u16,
    /// Secret holding the generated credential
    pub credentials_secret: String,
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
    pub deletion_protection: bool,
    pub removal_policy: RemovalPolicy,
}

#[derive(Debug, Clone)]
pub struct DatabaseHandle {
    pub id: String,
    pub database_name: String,
    pub port: u16,
}

impl DatabaseHandle {
    /// Endpoint address is assigned at deploy time
    pub fn endpoint_address(&self) -> AttrRef {
        AttrRef::new(&self.id, "endpoint-address")
    }
}

/// Step 7: create the database on the isolated subnet tier only
pub fn plan_database(
    plan: &mut DeploymentPlan,
    names: &ResolvedNames,
    network: &NetworkHandle,
    secret: &SecretHandle,
    group: &SecurityGroupHandle,
) -> Result<DatabaseHandle> {
    let spec = DatabaseSpec {
        identifier: DATABASE_ID.to_string(),
        engine: "postgres".to_string(),
        engine_version: "9.6.18".to_string(),
        parameter_group: "default.postgres9.6".to_string(),
        instance_class: "db.t3.micro".to_string(),
        allocated_storage_gib: 20,
        database_name: names.database.clone(),
        port: DATABASE_PORT,
        credentials_secret: secret.id.clone(),
        subnet_ids: network.isolated_subnet_ids.clone(),
        security_group_ids: vec![group.id.clone()],
        deletion_protection: false,
        removal_policy: RemovalPolicy::Destroy,
    };
    plan.add(PlannedResource::new("database", DATABASE_ID, &spec)?)?;

    Ok(DatabaseHandle {
        id: DATABASE_ID.to_string(),
        database_name: names.database.clone(),
        port: DATABASE_PORT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopologyConfig;
    use crate::network::plan_network;
    use crate::secrets::plan_database_secret;
    use crate::security::plan_security_groups;

    #[test]
    fn test_database_isolated_placement() {
        let mut plan = DeploymentPlan::new();
        let names = ResolvedNames::resolve(&TopologyConfig::default());
        let network = plan_network(&mut plan, &names).unwrap();
        let groups = plan_security_groups(&mut plan, &network).unwrap();
        let secret = plan_database_secret(&mut plan).unwrap();
        let db = plan_database(&mut plan, &names, &network, &secret, &groups.database).unwrap();

        let spec: DatabaseSpec = plan.get("database", &db.id).unwrap().decode().unwrap();
        assert_eq!(spec.subnet_ids, network.isolated_subnet_ids);
        for subnet in &spec.subnet_ids {
            assert!(!network.public_subnet_ids.contains(subnet));
        }
        assert_eq!(spec.port, 5432);
        assert_eq!(spec.credentials_secret, secret.id);
        assert!(!spec.deletion_protection);
        assert_eq!(spec.security_group_ids, vec![groups.database.id]);
    }

    #[test]
    fn test_endpoint_token() {
        let db = DatabaseHandle {
            id: "airflow-db".to_string(),
            database_name: "airflowdb".to_string(),
            port: DATABASE_PORT,
        };
        assert_eq!(
            db.endpoint_address().token(),
            "${airflow-db#endpoint-address}"
        );
    }
}
