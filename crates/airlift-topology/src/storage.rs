//! Object-storage bucket for shared DAG and config artifacts

use crate::config::ResolvedNames;
use crate::error::Result;
use crate::lifecycle::RemovalPolicy;
use airlift_plan::{DeploymentPlan, PlanOutput, PlannedResource};
use serde::{Deserialize, Serialize};

/// Public-access blocks; every flag stays on for a private-only bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub block_public_policy: bool,
    pub ignore_public_acls: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    pub fn all_blocked() -> Self {
        Self {
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }

    pub fn is_fully_blocked(&self) -> bool {
        self.block_public_acls
            && self.block_public_policy
            && self.ignore_public_acls
            && self.restrict_public_buckets
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSpec {
    pub name: String,
    pub public_access: PublicAccessBlock,
    pub removal_policy: RemovalPolicy,
    /// Purge remaining objects on teardown so the bucket can be deleted
    pub auto_purge_objects: bool,
}

#[derive(Debug, Clone)]
pub struct BucketHandle {
    pub id: String,
    pub name: String,
}

impl BucketHandle {
    /// Bucket ARNs derive from the name alone, so they resolve at plan time
    pub fn arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.name)
    }
}

/// Step 5: create the artifact bucket and export its resolved name
pub fn plan_bucket(plan: &mut DeploymentPlan, names: &ResolvedNames) -> Result<BucketHandle> {
    let spec = BucketSpec {
        name: names.bucket.clone(),
        public_access: PublicAccessBlock::all_blocked(),
        removal_policy: RemovalPolicy::Destroy,
        auto_purge_objects: true,
    };
    plan.add(PlannedResource::new("bucket", &names.bucket, &spec)?)?;

    plan.add_output(PlanOutput {
        name: "airflow-bucket".to_string(),
        value: names.bucket.clone(),
        export_name: "AirflowBucket".to_string(),
        description: "Bucket name".to_string(),
    });

    Ok(BucketHandle {
        id: names.bucket.clone(),
        name: names.bucket.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopologyConfig;

    #[test]
    fn test_bucket_private_and_disposable() {
        let mut plan = DeploymentPlan::new();
        let names = ResolvedNames::resolve(&TopologyConfig::default());
        let bucket = plan_bucket(&mut plan, &names).unwrap();

        let spec: BucketSpec = plan.get("bucket", &bucket.id).unwrap().decode().unwrap();
        assert!(spec.public_access.is_fully_blocked());
        assert_eq!(spec.removal_policy, RemovalPolicy::Destroy);
        assert!(spec.auto_purge_objects);
    }

    #[test]
    fn test_bucket_name_exported() {
        let mut plan = DeploymentPlan::new();
        let names = ResolvedNames::resolve(&TopologyConfig::default());
        let bucket = plan_bucket(&mut plan, &names).unwrap();

        let output = plan
            .outputs
            .iter()
            .find(|o| o.export_name == "AirflowBucket")
            .unwrap();
        assert_eq!(output.value, bucket.name);
    }

    #[test]
    fn test_bucket_arn() {
        let bucket = BucketHandle {
            id: "airflow-bucket-7".to_string(),
            name: "airflow-bucket-7".to_string(),
        };
        assert_eq!(bucket.arn(), "arn:aws:s3:::airflow-bucket-7");
    }
}
