use serde::{Deserialize, Serialize};

/// Evaluator limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Longest range a `..` expression may materialize. `None` is unbounded.
    pub max_range_length: Option<usize>,
}

impl EvalConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_max_range_length(mut self, limit: usize) -> Self {
        self.max_range_length = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(EvalConfig::default().max_range_length, None);
    }

    #[test]
    fn test_from_json() {
        let config = EvalConfig::from_json(r#"{"max_range_length": 100}"#).unwrap();
        assert_eq!(config, EvalConfig::default().with_max_range_length(100));
        assert_eq!(EvalConfig::from_json("{}").unwrap(), EvalConfig::default());
        let negative = EvalConfig::from_json(r#"{"max_range_length": -1}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EvalConfig::default().with_max_range_length(7);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"max_range_length":7}"#);
        assert_eq!(EvalConfig::from_json(&json).unwrap(), config);
    }
}
