//! Operator recommendations.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// How urgent a recommendation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl From<serde_json::Value> for Severity {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map(Self::from).unwrap_or_default()
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "warning" | "warn" => Severity::Warning,
            "critical" | "error" | "high" => Severity::Critical,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggestion surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub detail: String,
    pub severity: Severity,
    /// Backend the recommendation concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub backend: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_decode_with_alias() {
        let r: Recommendation =
            serde_json::from_str(r#"{"title": "t", "severity": "HIGH"}"#).unwrap();
        assert_eq!(r.severity, Severity::Critical);
        assert!(r.backend.is_none());
    }

    #[test]
    fn test_null_severity_is_info() {
        let r: Recommendation =
            serde_json::from_str(r#"{"title": "t", "severity": null, "backend": 5}"#).unwrap();
        assert_eq!(r.severity, Severity::Info);
        assert!(r.backend.is_none());
    }
}
