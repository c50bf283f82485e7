//! Configuration for a link block instance
use crate::services::LinkBlockError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Keystroke quiet windows above this are almost certainly a unit mistake (seconds vs ms)
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// User-facing notification texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationMessages {
    /// Shown when a block would embed the document it lives in
    pub self_reference: String,

    /// Shown when metadata for a pasted URL could not be resolved
    pub unresolvable_link: String,
}

impl Default for NotificationMessages {
    fn default() -> Self {
        Self {
            self_reference: "A document cannot embed itself, please choose another document"
                .to_string(),
            unresolvable_link: "This link could not be resolved".to_string(),
        }
    }
}

/// Tunables for one link block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkBlockConfig {
    /// Quiet window before a typed query is dispatched
    pub debounce_ms: u64,

    /// Minimum time the progress indicator stays visible
    pub min_progress_ms: u64,

    /// Delay between blur and hiding the suggestion overlay
    pub blur_hide_delay_ms: u64,

    /// Display label for blocks without a target
    pub untitled_label: String,

    /// Read-only blocks render but ignore all input
    pub read_only: bool,

    pub messages: NotificationMessages,
}

impl Default for LinkBlockConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            min_progress_ms: 500,
            blur_hide_delay_ms: 500,
            untitled_label: "Untitled".to_string(),
            read_only: false,
            messages: NotificationMessages::default(),
        }
    }
}

impl LinkBlockConfig {
    /// Parse a (possibly partial) JSON config on top of the defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, LinkBlockError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| LinkBlockError::serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), LinkBlockError> {
        if self.debounce_ms == 0 {
            return Err(LinkBlockError::invalid_config(
                "debounce_ms must be greater than 0",
            ));
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(LinkBlockError::invalid_config(format!(
                "debounce_ms cannot exceed {}",
                MAX_DEBOUNCE_MS
            )));
        }

        if self.untitled_label.trim().is_empty() {
            return Err(LinkBlockError::invalid_config(
                "untitled_label cannot be empty",
            ));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn min_progress(&self) -> Duration {
        Duration::from_millis(self.min_progress_ms)
    }

    pub fn blur_hide_delay(&self) -> Duration {
        Duration::from_millis(self.blur_hide_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LinkBlockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert_eq!(config.min_progress(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            LinkBlockConfig::from_json_str(r#"{ "debounceMs": 250, "readOnly": true }"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert!(config.read_only);
        assert_eq!(config.min_progress_ms, 500);
        assert_eq!(config.untitled_label, "Untitled");
    }

    #[test]
    fn test_partial_messages() {
        let config = LinkBlockConfig::from_json_str(
            r#"{ "messages": { "selfReference": "nope" } }"#,
        )
        .unwrap();
        assert_eq!(config.messages.self_reference, "nope");
        assert_eq!(
            config.messages.unresolvable_link,
            NotificationMessages::default().unresolvable_link
        );
    }

    #[test]
    fn test_validation_errors() {
        let zero = LinkBlockConfig {
            debounce_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(LinkBlockError::InvalidConfig(_))
        ));

        let huge = LinkBlockConfig {
            debounce_ms: 60_000,
            ..Default::default()
        };
        assert!(huge.validate().is_err());

        let blank = LinkBlockConfig {
            untitled_label: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let result = LinkBlockConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(LinkBlockError::Serialization(_))));
    }
}
