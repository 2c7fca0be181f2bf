//! End-to-end topology build scenarios

use airlift_topology::{TopologyBuilder, TopologyConfig};
use std::collections::HashSet;

fn default_config() -> TopologyConfig {
    TopologyConfig::with_fernet_key("integration-fernet-key")
}

#[test]
fn test_default_build_resource_counts() {
    let topology = TopologyBuilder::build(&default_config()).unwrap();
    let summary = topology.plan.summary();

    assert_eq!(summary.count("network"), 1);
    assert_eq!(summary.count("security-group"), 4);
    assert_eq!(summary.count("bucket"), 1);
    assert_eq!(summary.count("secret"), 1);
    assert_eq!(summary.count("database"), 1);
    assert_eq!(summary.count("cache"), 1);
    assert_eq!(summary.count("cluster"), 1);
    assert_eq!(summary.count("service"), 3);
    assert_eq!(summary.count("log-group"), 3);
    assert_eq!(summary.count("endpoint"), 6);
    assert_eq!(summary.count("identity"), 2);
}

#[test]
fn test_default_names_substituted() {
    let topology = TopologyBuilder::build(&default_config()).unwrap();
    let handles = &topology.handles;

    assert!(handles.bucket.name.starts_with("airflow-bucket-"));
    assert_eq!(handles.network.name, "airflow-vpc");
    assert_eq!(handles.database.database_name, "airflowdb");
    assert_eq!(handles.cache.cluster_name, "airflowredis");
    assert_eq!(handles.cluster.name, "AirflowECSCluster");
}

#[test]
fn test_explicit_names_used_verbatim() {
    let config = TopologyConfig {
        bucket_name: Some("team-dags".to_string()),
        network_name: Some("team-net".to_string()),
        database_name: Some("teammeta".to_string()),
        cache_name: Some("teamqueue".to_string()),
        cluster_name: Some("team-cluster".to_string()),
        fernet_key: Some("integration-fernet-key".to_string()),
    };
    let topology = TopologyBuilder::build(&config).unwrap();
    let handles = &topology.handles;

    assert_eq!(handles.bucket.name, "team-dags");
    assert_eq!(handles.network.name, "team-net");
    assert_eq!(handles.database.database_name, "teammeta");
    assert_eq!(handles.cache.cluster_name, "teamqueue");
    assert_eq!(handles.cluster.name, "team-cluster");
    assert!(topology.plan.get("bucket", "team-dags").is_some());
}

#[test]
fn test_generated_bucket_names_unique_across_builds() {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let topology = TopologyBuilder::build(&default_config()).unwrap();
        assert!(
            seen.insert(topology.handles.bucket.name.clone()),
            "bucket name collision: {}",
            topology.handles.bucket.name
        );
    }
}

#[test]
fn test_explicit_bucket_name_stable_across_builds() {
    let mut config = default_config();
    config.bucket_name = Some("pinned-bucket".to_string());

    let first = TopologyBuilder::build(&config).unwrap();
    let second = TopologyBuilder::build(&config).unwrap();
    assert_eq!(first.handles.bucket.name, "pinned-bucket");
    assert_eq!(second.handles.bucket.name, "pinned-bucket");
}

#[test]
fn test_same_config_builds_identical_plans() {
    let mut config = default_config();
    config.bucket_name = Some("pinned-bucket".to_string());

    let first = TopologyBuilder::build(&config).unwrap();
    let second = TopologyBuilder::build(&config).unwrap();

    let a = serde_json::to_value(&first.plan).unwrap();
    let b = serde_json::to_value(&second.plan).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_network_shape() {
    let topology = TopologyBuilder::build(&default_config()).unwrap();
    let network = &topology.handles.network;

    assert_eq!(network.availability_zones.len(), 2);
    assert_eq!(network.public_subnet_ids.len(), 2);
    assert_eq!(network.isolated_subnet_ids.len(), 2);
}

#[test]
fn test_data_stores_never_on_public_subnets() {
    let topology = TopologyBuilder::build(&default_config()).unwrap();
    let public: HashSet<&String> = topology.handles.network.public_subnet_ids.iter().collect();

    let db_subnets: Vec<String> = topology
        .plan
        .get("database", "airflow-db")
        .unwrap()
        .get("subnet_ids")
        .unwrap();
    assert!(!db_subnets.is_empty());
    assert!(db_subnets.iter().all(|s| !public.contains(s)));

    let cache_subnets: Vec<String> = topology
        .plan
        .get("cache-subnet-group", "airflowredis-subnets")
        .unwrap()
        .get("subnet_ids")
        .unwrap();
    assert!(!cache_subnets.is_empty());
    assert!(cache_subnets.iter().all(|s| !public.contains(s)));
}

#[test]
fn test_no_extra_ingress_on_guarded_ports() {
    let topology = TopologyBuilder::build(&default_config()).unwrap();
    let service_group = &topology.handles.security_groups.service.id;

    for group in topology.plan.by_type("security-group") {
        let rules: Vec<serde_json::Value> = group.get("ingress").unwrap();
        for rule in rules {
            let port = rule["port"].as_u64().unwrap();
            match port {
                5432 | 6379 => {
                    assert_eq!(
                        rule["peer"]["security_group"].as_str().unwrap(),
                        service_group,
                        "port {port} must only accept the service group"
                    );
                }
                8080 => {
                    assert_eq!(rule["peer"]["security_group"].as_str().unwrap(), service_group);
                }
                443 => {
                    assert_eq!(rule["peer"]["cidr"].as_str().unwrap(), "10.0.0.0/16");
                }
                other => panic!("unexpected ingress port {other}"),
            }
        }
    }
}

#[test]
fn test_plan_never_contains_fernet_key_outside_service_env() {
    // The key appears only as service environment, never in any other spec
    let topology = TopologyBuilder::build(&default_config()).unwrap();
    for resource in &topology.plan.resources {
        if resource.resource_type == "service" {
            continue;
        }
        assert!(
            !resource.spec.to_string().contains("integration-fernet-key"),
            "fernet key leaked into {}",
            resource.key()
        );
    }
}
