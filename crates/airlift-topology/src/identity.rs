//! Workload identities
//!
//! Two identities: the execution identity pulls images and writes logs on
//! behalf of the platform; the task identity is what the containers run as.
//! Permissions are explicit allow-lists scoped to the exact bucket and secret
//! — never broad managed policies.

use crate::error::Result;
use crate::secrets::SecretHandle;
use crate::storage::BucketHandle;
use airlift_plan::{DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

const TASK_SERVICE_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";
const EXECUTION_IDENTITY: &str = "airflow-task-execution-role";
const TASK_IDENTITY: &str = "airflow-task-role";

/// One allow-list entry: actions permitted on the named resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn new<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySpec {
    pub name: String,
    /// Service principal allowed to assume the identity
    pub assumed_by: String,
    pub statements: Vec<PolicyStatement>,
}

#[derive(Debug, Clone)]
pub struct IdentityHandle {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Identities {
    pub execution: IdentityHandle,
    pub task: IdentityHandle,
}

fn add_identity(
    plan: &mut DeploymentPlan,
    name: &str,
    statements: Vec<PolicyStatement>,
) -> Result<IdentityHandle> {
    let spec = IdentitySpec {
        name: name.to_string(),
        assumed_by: TASK_SERVICE_PRINCIPAL.to_string(),
        statements,
    };
    plan.add(PlannedResource::new("identity", name, &spec)?)?;
    Ok(IdentityHandle {
        id: name.to_string(),
        name: name.to_string(),
    })
}

/// Step 10: create the execution and task identities
pub fn plan_identities(
    plan: &mut DeploymentPlan,
    bucket: &BucketHandle,
    secret: &SecretHandle,
) -> Result<Identities> {
    let execution = add_identity(
        plan,
        EXECUTION_IDENTITY,
        vec![
            PolicyStatement::new(
                [
                    "ecr:GetAuthorizationToken",
                    "ecr:BatchCheckLayerAvailability",
                    "ecr:GetDownloadUrlForLayer",
                    "ecr:BatchGetImage",
                ],
                ["*"],
            ),
            PolicyStatement::new(["logs:CreateLogStream", "logs:PutLogEvents"], ["*"]),
        ],
    )?;

    let task = add_identity(
        plan,
        TASK_IDENTITY,
        vec![
            PolicyStatement::new(
                ["s3:ListBucket", "s3:GetObject", "s3:GetBucketLocation"],
                [bucket.arn(), format!("{}/*", bucket.arn())],
            ),
            PolicyStatement::new(["secretsmanager:GetSecretValue"], [secret.arn().token()]),
        ],
    )?;

    Ok(Identities { execution, task })
}
