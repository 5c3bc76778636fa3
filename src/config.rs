//! Configuration for marble operators

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bounds::{BoundsStrategy, WidestBounds};
use crate::errors::{MarbleError, MarbleResult};
use crate::input::MarbleInput;
use crate::scheduler::Scheduler;
use crate::timeline::Bounds;

/// Static operator settings
///
/// Metadata left as `None` falls back to what the combinator reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Display name override
    pub name: Option<String>,
    /// Type signature label override
    pub kind: Option<String>,
    /// Description override
    pub description: Option<String>,
    /// Window used by the default bounds strategy when no input is a timeline
    pub default_bounds: Bounds,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            name: None,
            kind: None,
            description: None,
            default_bounds: Bounds::DEFAULT,
        }
    }
}

impl OperatorConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> MarbleResult<Self> {
        let config: OperatorConfig = serde_json::from_str(json)?;
        if config.default_bounds.start > config.default_bounds.end {
            return Err(MarbleError::Configuration(format!(
                "default bounds start {} is after end {}",
                config.default_bounds.start, config.default_bounds.end
            )));
        }
        Ok(config)
    }
}

/// Everything an operator needs at construction
pub struct OperatorOptions<I> {
    /// Ordered inputs
    pub inputs: Vec<MarbleInput<I>>,
    /// Scheduler running deferred flushes
    pub scheduler: Rc<dyn Scheduler>,
    /// Bounds strategy; `None` selects [`WidestBounds`] over `config.default_bounds`
    pub bounds_strategy: Option<Rc<dyn BoundsStrategy<I>>>,
    /// Static settings
    pub config: OperatorConfig,
}

impl<I> OperatorOptions<I> {
    /// Options with default configuration
    pub fn new(inputs: Vec<MarbleInput<I>>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            inputs,
            scheduler,
            bounds_strategy: None,
            config: OperatorConfig::default(),
        }
    }

    /// Use a custom bounds strategy
    pub fn with_bounds_strategy(mut self, strategy: impl BoundsStrategy<I> + 'static) -> Self {
        self.bounds_strategy = Some(Rc::new(strategy));
        self
    }

    /// Replace the static settings
    pub fn with_config(mut self, config: OperatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// The configured strategy, or the default widest-bounds strategy
    pub(crate) fn resolve_bounds_strategy(&self) -> Rc<dyn BoundsStrategy<I>> {
        match &self.bounds_strategy {
            Some(strategy) => Rc::clone(strategy),
            None => Rc::new(WidestBounds::new(self.config.default_bounds)),
        }
    }
}

impl<I> fmt::Debug for OperatorOptions<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorOptions")
            .field("inputs", &self.inputs)
            .field("custom_bounds_strategy", &self.bounds_strategy.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OperatorConfig::default();
        assert_eq!(config.default_bounds, Bounds::new(0, 100));
        assert!(config.name.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let config = OperatorConfig::from_json(
            r#"{ "name": "zip", "default_bounds": { "start": 0, "end": 40 } }"#,
        )
        .unwrap();

        assert_eq!(config.name.as_deref(), Some("zip"));
        assert_eq!(config.default_bounds, Bounds::new(0, 40));
        assert!(config.description.is_none());
    }

    #[test]
    fn test_config_rejects_inverted_bounds() {
        let err = OperatorConfig::from_json(r#"{ "default_bounds": { "start": 9, "end": 1 } }"#)
            .unwrap_err();
        assert!(matches!(err, MarbleError::Configuration(_)));
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        let err = OperatorConfig::from_json("{ name: ").unwrap_err();
        assert!(matches!(err, MarbleError::Serialization(_)));
    }
}
