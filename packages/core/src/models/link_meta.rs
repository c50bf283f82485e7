//! Preview payload attached to a link block.
//!
//! The shape is owned by whichever backend resolves link metadata, so the
//! payload is kept as an opaque JSON object. Well-known keys (`title`,
//! `description`, `favicon`, `url`, `image`, `time`) have accessors that read
//! string values; values of any other type, including `null`, are stored and
//! written back untouched.

use crate::utils::strip_tags;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Keys whose string values are tag-stripped on commit.
const FREE_TEXT_KEYS: [&str; 2] = ["title", "description"];

/// Structured preview data for a link target.
///
/// A meta object is *present* when it has at least one key, regardless of the
/// key's value. Presence is what switches a block into preview mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct LinkMeta {
    fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for LinkMeta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A stored `null` meta loads as "no meta"
        let fields = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Self {
            fields: fields.unwrap_or_default(),
        })
    }
}

impl From<Map<String, Value>> for LinkMeta {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl LinkMeta {
    /// Meta carrying only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::default().with("title", title.into())
    }

    /// Best-effort preview for a URL nothing could be resolved for.
    pub fn fallback_for(url: &str) -> Self {
        Self::default()
            .with("title", url)
            .with("description", url)
            .with("favicon", "")
            .with("url", url)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// String value under `key`; `None` when missing or not a string.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_value("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_value("description")
    }

    pub fn favicon(&self) -> Option<&str> {
        self.str_value("favicon")
    }

    pub fn url(&self) -> Option<&str> {
        self.str_value("url")
    }

    /// True when the object has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy with tags stripped from string-valued title and description.
    pub fn sanitized(mut self) -> Self {
        for key in FREE_TEXT_KEYS {
            if let Some(Value::String(text)) = self.fields.get_mut(key) {
                *text = strip_tags(text);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presence_is_key_based() {
        assert!(LinkMeta::default().is_empty());
        assert!(!LinkMeta::titled("").is_empty());

        let meta: LinkMeta = serde_json::from_value(json!({ "custom": 1 })).unwrap();
        assert!(!meta.is_empty());
    }

    #[test]
    fn test_null_valued_key_counts_as_present() {
        let raw = json!({ "title": null });
        let meta: LinkMeta = serde_json::from_value(raw.clone()).unwrap();

        assert!(!meta.is_empty());
        assert!(meta.title().is_none());
        assert_eq!(serde_json::to_value(&meta).unwrap(), raw);
    }

    #[test]
    fn test_non_string_values_survive_round_trip() {
        let raw = json!({
            "title": 42,
            "description": ["a"],
            "favicon": { "href": "/favicon.ico" }
        });
        let meta: LinkMeta = serde_json::from_value(raw.clone()).unwrap();

        assert!(meta.title().is_none());
        let sanitized = meta.sanitized();
        assert_eq!(serde_json::to_value(&sanitized).unwrap(), raw);
    }

    #[test]
    fn test_null_meta_loads_empty() {
        let meta: LinkMeta = serde_json::from_value(json!(null)).unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let raw = json!({
            "title": "Page",
            "image": { "url": "https://cdn.example/p.png" },
            "siteName": "Example",
            "time": 1714560000
        });
        let meta: LinkMeta = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(meta.get("siteName"), Some(&json!("Example")));
        assert_eq!(serde_json::to_value(&meta).unwrap(), raw);
    }

    #[test]
    fn test_sanitized_strips_title_and_description_only() {
        let meta = LinkMeta::default()
            .with("title", "<b>Bold</b> title")
            .with("description", "<p>About</p>")
            .with("favicon", "<svg/>")
            .sanitized();

        assert_eq!(meta.title(), Some("Bold title"));
        assert_eq!(meta.description(), Some("About"));
        assert_eq!(meta.favicon(), Some("<svg/>"));
    }

    #[test]
    fn test_fallback_uses_url_everywhere() {
        let meta = LinkMeta::fallback_for("https://down.example");
        assert_eq!(meta.title(), Some("https://down.example"));
        assert_eq!(meta.description(), Some("https://down.example"));
        assert_eq!(meta.favicon(), Some(""));
        assert!(!meta.is_empty());
    }
}
