//! Deploy-time attribute references
//!
//! Some resource attributes (a database endpoint address, a secret ARN) do
//! not exist until the deployment engine has materialized the resource. The
//! plan carries them as `${id#attribute}` tokens which the engine substitutes
//! during execution.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Reference to an attribute of a planned resource, resolved at deploy time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRef {
    /// Identifier of the planned resource
    pub resource: String,

    /// Attribute name (e.g. "endpoint-address", "arn")
    pub attribute: String,
}

impl AttrRef {
    pub fn new(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// Render the interpolation token
    pub fn token(&self) -> String {
        format!("${{{}#{}}}", self.resource, self.attribute)
    }

    /// Parse a `${id#attribute}` token back into a reference
    pub fn parse(token: &str) -> Option<Self> {
        let inner = token.strip_prefix("${")?.strip_suffix('}')?;
        let (resource, attribute) = inner.split_once('#')?;
        if resource.is_empty() || attribute.is_empty() {
            return None;
        }
        Some(Self::new(resource, attribute))
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl Serialize for AttrRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for AttrRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        AttrRef::parse(&token)
            .ok_or_else(|| D::Error::custom(format!("invalid attribute reference: {token}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let r = AttrRef::new("airflow-db", "endpoint-address");
        assert_eq!(r.token(), "${airflow-db#endpoint-address}");
        assert_eq!(r.to_string(), r.token());
    }

    #[test]
    fn test_parse_roundtrip() {
        let r = AttrRef::new("airflow-db-credentials", "arn");
        assert_eq!(AttrRef::parse(&r.token()), Some(r));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(AttrRef::parse("airflow-db#arn"), None);
        assert_eq!(AttrRef::parse("${airflow-db}"), None);
        assert_eq!(AttrRef::parse("${#arn}"), None);
    }

    #[test]
    fn test_serde_as_string() {
        let r = AttrRef::new("redis", "endpoint-address");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"${redis#endpoint-address}\"");

        let back: AttrRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
