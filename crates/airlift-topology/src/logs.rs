//! Per-service log groups

use crate::error::Result;
use crate::identity::IdentityHandle;
use crate::lifecycle::RemovalPolicy;
use airlift_plan::{DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

pub const LOG_RETENTION_DAYS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogGroupSpec {
    pub name: String,
    pub retention_days: u32,
    pub removal_policy: RemovalPolicy,
    /// Identities granted write access
    pub write_access: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LogGroupHandle {
    pub id: String,
    pub name: String,
}

/// One log group per service role
#[derive(Debug, Clone)]
pub struct LogGroups {
    pub webserver: LogGroupHandle,
    pub scheduler: LogGroupHandle,
    pub worker: LogGroupHandle,
}

fn add_log_group(
    plan: &mut DeploymentPlan,
    id: &str,
    name: &str,
    task_identity: &IdentityHandle,
) -> Result<LogGroupHandle> {
    let spec = LogGroupSpec {
        name: name.to_string(),
        retention_days: LOG_RETENTION_DAYS,
        removal_policy: RemovalPolicy::Destroy,
        write_access: vec![task_identity.id.clone()],
    };
    plan.add(PlannedResource::new("log-group", id, &spec)?)?;
    Ok(LogGroupHandle {
        id: id.to_string(),
        name: name.to_string(),
    })
}

/// Step 11: create the three log destinations, writable by the task identity
pub fn plan_log_groups(
    plan: &mut DeploymentPlan,
    task_identity: &IdentityHandle,
) -> Result<LogGroups> {
    Ok(LogGroups {
        webserver: add_log_group(
            plan,
            "airflow-webserver-lg",
            "/ecs/airflow-webserver",
            task_identity,
        )?,
        scheduler: add_log_group(
            plan,
            "airflow-scheduler-lg",
            "/ecs/airflow-scheduler",
            task_identity,
        )?,
        worker: add_log_group(
            plan,
            "airflow-worker-lg",
            "/ecs/airflow-worker",
            task_identity,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_log_groups_with_retention() {
        let mut plan = DeploymentPlan::new();
        let task = IdentityHandle {
            id: "airflow-task-role".to_string(),
            name: "airflow-task-role".to_string(),
        };
        let groups = plan_log_groups(&mut plan, &task).unwrap();

        assert_eq!(plan.by_type("log-group").len(), 3);
        assert_eq!(groups.worker.name, "/ecs/airflow-worker");

        for id in ["airflow-webserver-lg", "airflow-scheduler-lg", "airflow-worker-lg"] {
            let spec: LogGroupSpec = plan.get("log-group", id).unwrap().decode().unwrap();
            assert_eq!(spec.retention_days, 30);
            assert_eq!(spec.removal_policy, RemovalPolicy::Destroy);
            assert_eq!(spec.write_access, vec!["airflow-task-role".to_string()]);
        }
    }
}
