//! Database credential secret
//!
//! The plan carries only the generation recipe. The deployment engine
//! generates the password; no plaintext ever appears in the plan, in handles,
//! or in logs — services receive the credential by secret reference.

use crate::error::Result;
use airlift_plan::{AttrRef, DeploymentPlan, PlannedResource};
use serde::{Deserialize, Serialize};

pub const DATABASE_USERNAME: &str = "airflow";
const SECRET_NAME: &str = "airflow-db-credentials";

/// Recipe for the generated password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub length: u8,
    /// Characters that would break connection strings or JSON templates
    pub exclude_characters: String,
    pub exclude_punctuation: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 16,
            exclude_characters: "\"@/".to_string(),
            exclude_punctuation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretSpec {
    pub name: String,
    /// Fixed username; only the password is generated
    pub username: String,
    pub generate: PasswordPolicy,
}

#[derive(Debug, Clone)]
pub struct SecretHandle {
    pub id: String,
    pub name: String,
}

impl SecretHandle {
    /// Secret ARNs are assigned at deploy time
    pub fn arn(&self) -> AttrRef {
        AttrRef::new(&self.id, "arn")
    }
}

/// Step 6: create the credential secret referenced by all services
pub fn plan_database_secret(plan: &mut DeploymentPlan) -> Result<SecretHandle> {
    let spec = SecretSpec {
        name: SECRET_NAME.to_string(),
        username: DATABASE_USERNAME.to_string(),
        generate: PasswordPolicy::default(),
    };
    plan.add(PlannedResource::new("secret", SECRET_NAME, &spec)?)?;

    Ok(SecretHandle {
        id: SECRET_NAME.to_string(),
        name: SECRET_NAME.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_recipe() {
        let mut plan = DeploymentPlan::new();
        let secret = plan_database_secret(&mut plan).unwrap();

        let spec: SecretSpec = plan.get("secret", &secret.id).unwrap().decode().unwrap();
        assert_eq!(spec.username, "airflow");
        assert_eq!(spec.generate.length, 16);
        assert_eq!(spec.generate.exclude_characters, "\"@/");
        assert!(spec.generate.exclude_punctuation);
    }

    #[test]
    fn test_no_plaintext_password_in_plan() {
        let mut plan = DeploymentPlan::new();
        plan_database_secret(&mut plan).unwrap();

        let spec = &plan.get("secret", "airflow-db-credentials").unwrap().spec;
        assert!(spec.get("password").is_none());
    }

    #[test]
    fn test_arn_is_deferred() {
        let mut plan = DeploymentPlan::new();
        let secret = plan_database_secret(&mut plan).unwrap();
        assert_eq!(secret.arn().token(), "${airflow-db-credentials#arn}");
    }
}
