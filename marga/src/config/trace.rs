//! Main TraceConfig and conversion methods.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cost::CostModelKind;
use crate::path::PathGraph;
use crate::search::{DestinationCriteria, SearchSettings};
use crate::volume::TubenessField;

use super::error::ConfigLoadError;
use super::open_search::OpenSearchSection;
use super::search::SearchSection;
use super::simplify::SimplifySection;

/// Full tracing configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    /// Search loop settings
    #[serde(default)]
    pub search: SearchSection,

    /// Cost model selection
    #[serde(default)]
    pub cost: CostModelKind,

    /// Path simplification
    #[serde(default)]
    pub simplify: SimplifySection,

    /// Open-ended search destinations
    #[serde(default)]
    pub open_search: OpenSearchSection,
}

impl TraceConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/marga.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/marga.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot honour
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.search.timeout_secs.is_finite() || self.search.timeout_secs < 0.0 {
            return Err(ConfigLoadError::Invalid {
                field: "search.timeout_secs",
                reason: format!("{} is not a non-negative duration", self.search.timeout_secs),
            });
        }
        if let CostModelKind::Tubeness { multiplier } = self.cost
            && !(multiplier.is_finite() && multiplier > 0.0)
        {
            return Err(ConfigLoadError::Invalid {
                field: "cost.multiplier",
                reason: format!("{} must be positive", multiplier),
            });
        }
        if self.simplify.epsilon < 0.0 {
            return Err(ConfigLoadError::Invalid {
                field: "simplify.epsilon",
                reason: format!("{} is negative", self.simplify.epsilon),
            });
        }
        Ok(())
    }

    /// Convert to SearchSettings
    pub fn to_search_settings(&self) -> SearchSettings {
        SearchSettings {
            timeout: Duration::from_secs_f64(self.search.timeout_secs),
            report_interval: Duration::from_millis(self.search.report_interval_ms),
            check_every: self.search.check_every.max(1),
            start_paused: self.search.start_paused,
            bidirectional: self.search.bidirectional,
            simplify_epsilon: self.simplify.enabled.then_some(self.simplify.epsilon),
        }
    }

    /// Convert to DestinationCriteria, attaching the optional runtime sources
    pub fn to_destination_criteria(
        &self,
        tubeness: Option<Arc<TubenessField>>,
        path_graph: Option<Arc<PathGraph>>,
    ) -> DestinationCriteria {
        DestinationCriteria {
            tubeness,
            tubeness_threshold: self.open_search.tubeness_threshold,
            path_graph,
            distance_limit: self.open_search.distance_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TraceConfig::default();
        assert_eq!(config.cost, CostModelKind::Reciprocal);
        assert!(config.search.bidirectional);
        let settings = config.to_search_settings();
        assert!(settings.timeout.is_zero());
        assert_eq!(settings.simplify_epsilon, None);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = TraceConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = TraceConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "
search:
  timeout_secs: 2.5
cost:
  kind: tubeness
  multiplier: 50.0
simplify:
  enabled: true
";
        let config = TraceConfig::from_yaml(yaml).unwrap();
        let settings = config.to_search_settings();
        assert_eq!(settings.timeout, Duration::from_millis(2500));
        assert_eq!(settings.report_interval, Duration::from_millis(1000));
        assert_eq!(settings.simplify_epsilon, Some(1.0));
        assert_eq!(config.cost, CostModelKind::Tubeness { multiplier: 50.0 });
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            TraceConfig::from_yaml("search:\n  timeout_secs: -1.0\n"),
            Err(ConfigLoadError::Invalid { .. })
        ));
        assert!(matches!(
            TraceConfig::from_yaml("cost:\n  kind: tubeness\n  multiplier: 0.0\n"),
            Err(ConfigLoadError::Invalid { .. })
        ));
        assert!(matches!(
            TraceConfig::from_yaml("search: [1, 2]"),
            Err(ConfigLoadError::Parse(_))
        ));
    }
}
