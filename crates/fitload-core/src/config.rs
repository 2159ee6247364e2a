//! Per-invocation settings.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::encode::EncodeBudget;
use crate::plan::ResizePolicy;

/// Everything the pipeline needs besides the file and the encoder.
///
/// Deserializes from a partial object; missing fields take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub policy: ResizePolicy,
    pub budget: EncodeBudget,
    pub filter: FilterType,
}

impl UploadConfig {
    pub fn new(policy: ResizePolicy, budget: EncodeBudget) -> Self {
        Self {
            policy,
            budget,
            filter: FilterType::default(),
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UploadConfig::default();
        assert_eq!(config.policy, ResizePolicy::fixed_square(242));
        assert_eq!(config.budget, EncodeBudget::default());
        assert_eq!(config.filter, FilterType::Bilinear);
    }

    #[test]
    fn test_with_filter() {
        let config = UploadConfig::new(ResizePolicy::aspect_fit(1024), EncodeBudget::default())
            .with_filter(FilterType::Lanczos3);
        assert_eq!(config.policy, ResizePolicy::aspect_fit(1024));
        assert_eq!(config.filter, FilterType::Lanczos3);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{
            "policy": { "kind": "aspect_fit", "max_dimension": 1280 },
            "budget": { "max_bytes": 512000 }
        }"#;
        let config: UploadConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.policy, ResizePolicy::aspect_fit(1280));
        assert_eq!(config.budget.max_bytes(), 512_000);
        assert_eq!(config.budget.start_quality(), 0.9);
        assert_eq!(config.filter, FilterType::Bilinear);
    }

    #[test]
    fn test_deserialize_empty_config() {
        let config: UploadConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UploadConfig::default());
    }

    #[test]
    fn test_deserialize_rejects_invalid_budget() {
        let json = r#"{ "budget": { "quality_step": 0 } }"#;
        let err = serde_json::from_str::<UploadConfig>(json).unwrap_err();
        assert!(err.to_string().contains("quality_step"));
    }

    #[test]
    fn test_round_trip_fixed_square() {
        let config = UploadConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""kind":"fixed_square""#));
        assert_eq!(serde_json::from_str::<UploadConfig>(&json).unwrap(), config);
    }
}
