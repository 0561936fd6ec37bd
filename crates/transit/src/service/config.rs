//! Routing configuration.

use std::time::Duration;

use crate::models::types::*;

/// Which criteria a route query answers, and how long one search may run
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    pub criteria: Vec<EdgeWeightType>,
    /// Per-search limit in milliseconds; `None` searches to completion
    pub search_timeout_ms: Option<u64>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            criteria: EdgeWeightType::ALL.to_vec(),
            search_timeout_ms: None,
        }
    }
}

impl RoutingConfig {
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TransitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.criteria.is_empty() {
            return Err(TransitError::Config("no routing criteria".to_string()));
        }

        for (i, criterion) in self.criteria.iter().enumerate() {
            if self.criteria[..i].contains(criterion) {
                return Err(TransitError::Config(format!(
                    "criterion {criterion} listed twice"
                )));
            }
        }

        Ok(())
    }

    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }
}
