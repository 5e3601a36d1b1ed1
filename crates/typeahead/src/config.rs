//! Typeahead configuration.
//!
//! [`TypeaheadConfig`] can be built in code with the `with_*` methods or
//! loaded from TOML:
//!
//! ```
//! use typeahead::config::{ClearBehavior, TypeaheadConfig};
//!
//! let config = TypeaheadConfig::from_toml_str(r#"
//!     debounce_ms = 150
//!     clear_behavior = "close"
//! "#).unwrap();
//!
//! assert_eq!(config.debounce_ms, 150);
//! assert_eq!(config.clear_behavior, ClearBehavior::Close);
//! assert_eq!(config.max_visible_rows, 7);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// What the option panel does after the clear affordance is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearBehavior {
    /// Keep the panel open, showing the full candidate set.
    #[default]
    KeepOpen,
    /// Close the panel.
    Close,
}

/// What happens to the candidate set when a retrieval fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Drop all candidates.
    #[default]
    ClearCandidates,
    /// Keep whatever the last successful retrieval produced.
    KeepLastKnown,
}

/// Configuration for a [`Typeahead`](crate::Typeahead).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeaheadConfig {
    /// Quiet period before a query is sent to a dynamic candidate source.
    pub debounce_ms: u64,
    /// Panel state after the input is cleared.
    pub clear_behavior: ClearBehavior,
    /// Candidate set handling on retrieval failure.
    pub failure_policy: FailurePolicy,
    /// Number of rows visible in the panel before it scrolls.
    pub max_visible_rows: usize,
    /// Row height used for scrolling and hit testing.
    pub row_height: f32,
    /// Gap between the input and the panel.
    pub panel_gap: f32,
    /// Issue a retrieval for the empty query when a dynamic widget mounts.
    pub retrieve_on_mount: bool,
    /// Whether Escape closes the panel.
    pub close_on_escape: bool,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            clear_behavior: ClearBehavior::KeepOpen,
            failure_policy: FailurePolicy::ClearCandidates,
            max_visible_rows: 7,
            row_height: 24.0,
            panel_gap: 4.0,
            retrieve_on_mount: true,
            close_on_escape: true,
        }
    }
}

impl TypeaheadConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Check that every field holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_visible_rows == 0 {
            return Err(ConfigError::invalid_value(
                "max_visible_rows",
                "must be at least 1",
            ));
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ConfigError::invalid_value(
                "row_height",
                format!("must be a positive number, got {}", self.row_height),
            ));
        }
        if !(self.panel_gap.is_finite() && self.panel_gap >= 0.0) {
            return Err(ConfigError::invalid_value(
                "panel_gap",
                format!("must be zero or positive, got {}", self.panel_gap),
            ));
        }
        Ok(())
    }

    /// The debounce interval as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Set the debounce interval using builder pattern.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = delay.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Set the clear behavior using builder pattern.
    pub fn with_clear_behavior(mut self, behavior: ClearBehavior) -> Self {
        self.clear_behavior = behavior;
        self
    }

    /// Set the failure policy using builder pattern.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the maximum visible rows using builder pattern.
    pub fn with_max_visible_rows(mut self, rows: usize) -> Self {
        self.max_visible_rows = rows.max(1);
        self
    }

    /// Set the row height using builder pattern.
    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }

    /// Enable or disable the initial retrieval on mount.
    pub fn with_retrieve_on_mount(mut self, enabled: bool) -> Self {
        self.retrieve_on_mount = enabled;
        self
    }

    /// Enable or disable closing the panel with Escape.
    pub fn with_close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TypeaheadConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.clear_behavior, ClearBehavior::KeepOpen);
        assert_eq!(config.failure_policy, FailurePolicy::ClearCandidates);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = TypeaheadConfig::from_toml_str("").unwrap();
        assert_eq!(config, TypeaheadConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = TypeaheadConfig::from_toml_str(
            r#"
            debounce_ms = 50
            failure_policy = "keep_last_known"
            max_visible_rows = 3
            close_on_escape = false
            "#,
        )
        .unwrap();

        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.failure_policy, FailurePolicy::KeepLastKnown);
        assert_eq!(config.max_visible_rows, 3);
        assert!(!config.close_on_escape);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TypeaheadConfig::from_toml_str("debounce = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TypeaheadConfig::from_toml_str("max_visible_rows = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_visible_rows",
                ..
            }
        ));

        let err = TypeaheadConfig::from_toml_str("row_height = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "row_height", .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms = 120").unwrap();

        let config = TypeaheadConfig::from_file(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 120);

        let missing = TypeaheadConfig::from_file("/nonexistent/typeahead.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_builder_methods() {
        let config = TypeaheadConfig::default()
            .with_debounce(Duration::from_millis(80))
            .with_clear_behavior(ClearBehavior::Close)
            .with_max_visible_rows(0);

        assert_eq!(config.debounce_ms, 80);
        assert_eq!(config.clear_behavior, ClearBehavior::Close);
        assert_eq!(config.max_visible_rows, 1);
    }
}
