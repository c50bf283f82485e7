//! Link Block Record Structures
//!
//! This module defines the canonical persisted state of one link block
//! (`BlockRecord`), the partial update shape fed into the merge engine
//! (`PartialBlockRecord`) and the string-backed `TargetType` tag.
//!
//! # Persisted Shape
//!
//! A saved block is exactly `{id, target, targetId, targetType, link, meta}`.
//! Older documents stored `target_id` / `target_type`; both spellings load.
//!
//! ```rust
//! use smartlink_core::models::{BlockRecord, TargetType};
//! use serde_json::json;
//!
//! let record: BlockRecord = serde_json::from_value(json!({
//!     "id": "a1b2c3d4-0000-4000-8000-000000000000",
//!     "target": "Quarterly report",
//!     "target_id": "doc-42",
//!     "target_type": "essay",
//!     "link": "doc-42",
//!     "meta": { "title": "Quarterly report" }
//! }))
//! .unwrap();
//!
//! assert_eq!(record.target_type, TargetType::Essay);
//! assert!(record.has_preview());
//! ```

use crate::models::LinkMeta;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Loads a stored `null` string field as empty.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Kind of thing a link block points at.
///
/// Backends may define tags beyond `essay` and `webs`; those are carried as
/// `Other` and written back verbatim. The empty string and `null` map to
/// `Unspecified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TargetType {
    #[default]
    Unspecified,
    /// Internal document
    Essay,
    /// External web page
    Webs,
    Other(String),
}

impl TargetType {
    pub fn as_str(&self) -> &str {
        match self {
            TargetType::Unspecified => "",
            TargetType::Essay => "essay",
            TargetType::Webs => "webs",
            TargetType::Other(tag) => tag,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<String> for TargetType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "" => TargetType::Unspecified,
            "essay" => TargetType::Essay,
            "webs" => TargetType::Webs,
            _ => TargetType::Other(tag),
        }
    }
}

impl From<Option<String>> for TargetType {
    fn from(tag: Option<String>) -> Self {
        tag.map(TargetType::from).unwrap_or_default()
    }
}

impl From<&str> for TargetType {
    fn from(tag: &str) -> Self {
        TargetType::from(tag.to_string())
    }
}

impl From<TargetType> for String {
    fn from(target_type: TargetType) -> Self {
        match target_type {
            TargetType::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical state of one link block.
///
/// # Fields
///
/// - `id`: Block identity, assigned once when `target_id` first becomes non-empty
/// - `target`: Plain-text display label (tags stripped)
/// - `target_id`: Linked internal document id, empty for external links
/// - `target_type`: What the link points at
/// - `link`: URL or internal reference
/// - `meta`: Preview payload; its presence selects preview mode
///
/// Records are only ever mutated through
/// [`MergeEngine::commit`](crate::services::MergeEngine::commit).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub target: String,

    #[serde(default, alias = "target_id", deserialize_with = "null_as_empty")]
    pub target_id: String,

    #[serde(default, alias = "target_type")]
    pub target_type: TargetType,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,

    #[serde(default)]
    pub meta: LinkMeta,
}

impl BlockRecord {
    /// Empty record used when a block is inserted without saved data.
    pub fn skeleton() -> Self {
        Self::default()
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.target.is_empty()
            && self.target_id.is_empty()
            && self.target_type.is_empty()
            && self.link.is_empty()
            && self.meta.is_empty()
    }

    /// Whether the block should render as a preview rather than an input.
    pub fn has_preview(&self) -> bool {
        !self.meta.is_empty()
    }

    /// Label to show for this block; storage is never coerced.
    pub fn display_target<'a>(&'a self, untitled_label: &'a str) -> &'a str {
        if self.target.is_empty() {
            untitled_label
        } else {
            &self.target
        }
    }
}

/// Partial update consumed by the merge engine.
///
/// Every field is optional. `None` and empty values leave the stored value
/// alone; see [`MergeEngine`](crate::services::MergeEngine) for the rules.
///
/// # Examples
///
/// ```rust
/// # use smartlink_core::models::{PartialBlockRecord, TargetType};
/// let update = PartialBlockRecord::new()
///     .with_target("Design notes")
///     .with_target_id("doc-7")
///     .with_target_type(TargetType::Essay);
/// assert!(!update.is_empty());
/// assert!(PartialBlockRecord::new().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialBlockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, alias = "target_id", skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    #[serde(default, alias = "target_type", skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LinkMeta>,
}

impl PartialBlockRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn with_target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = Some(target_type);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_meta(mut self, meta: LinkMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// True when no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.target.is_none()
            && self.target_id.is_none()
            && self.target_type.is_none()
            && self.link.is_none()
            && self.meta.is_none()
    }
}

impl From<BlockRecord> for PartialBlockRecord {
    fn from(record: BlockRecord) -> Self {
        Self {
            id: record.id,
            target: Some(record.target),
            target_id: Some(record.target_id),
            target_type: Some(record.target_type),
            link: Some(record.link),
            meta: Some(record.meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_type_round_trips_unknown_tags() {
        let tag: TargetType = serde_json::from_value(json!("mindmap")).unwrap();
        assert_eq!(tag, TargetType::Other("mindmap".to_string()));
        assert_eq!(serde_json::to_value(&tag).unwrap(), json!("mindmap"));

        let empty: TargetType = serde_json::from_value(json!("")).unwrap();
        assert_eq!(empty, TargetType::Unspecified);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_persisted_field_set_is_exact() {
        let record = BlockRecord {
            id: Some("abc".to_string()),
            target: "Report".to_string(),
            target_id: "doc-1".to_string(),
            target_type: TargetType::Essay,
            link: "doc-1".to_string(),
            meta: LinkMeta::titled("Report"),
        };

        let value = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["id", "link", "meta", "target", "targetId", "targetType"]
        );

        let back: BlockRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_legacy_snake_case_keys_load() {
        let record: BlockRecord = serde_json::from_value(json!({
            "target": "Old",
            "target_id": "doc-9",
            "target_type": "webs",
            "link": "https://old.example",
            "meta": {}
        }))
        .unwrap();

        assert_eq!(record.target_id, "doc-9");
        assert_eq!(record.target_type, TargetType::Webs);
        assert!(record.id.is_none());
        assert!(!record.has_preview());
    }

    #[test]
    fn test_null_fields_load_as_empty() {
        let record: BlockRecord = serde_json::from_value(json!({
            "target": null,
            "targetId": null,
            "targetType": null,
            "link": null,
            "meta": null
        }))
        .unwrap();

        assert_eq!(record, BlockRecord::skeleton());
        assert_eq!(record.target_type, TargetType::Unspecified);
    }

    #[test]
    fn test_opaque_meta_values_survive_round_trip() {
        let raw = json!({
            "id": "abc",
            "target": "Report",
            "targetId": "doc-1",
            "targetType": "essay",
            "link": "doc-1",
            "meta": { "title": 42, "description": ["a"], "favicon": null }
        });

        let record: BlockRecord = serde_json::from_value(raw.clone()).unwrap();
        assert!(record.has_preview());
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_null_title_meta_keeps_preview() {
        let record: BlockRecord = serde_json::from_value(json!({
            "target": "Report",
            "meta": { "title": null }
        }))
        .unwrap();

        assert!(record.has_preview());
        assert!(record.meta.title().is_none());
    }

    #[test]
    fn test_skeleton_is_empty() {
        let skeleton = BlockRecord::skeleton();
        assert!(skeleton.is_empty());
        assert_eq!(skeleton.display_target("Untitled"), "Untitled");
    }

    #[test]
    fn test_display_target_does_not_mutate() {
        let record = BlockRecord::skeleton();
        let label = record.display_target("Untitled");
        assert_eq!(label, "Untitled");
        assert!(record.target.is_empty());
    }

    #[test]
    fn test_partial_from_camel_case_json() {
        let update: PartialBlockRecord = serde_json::from_value(json!({
            "targetId": "doc-3",
            "targetType": "essay"
        }))
        .unwrap();

        assert_eq!(update.target_id.as_deref(), Some("doc-3"));
        assert_eq!(update.target_type, Some(TargetType::Essay));
        assert!(update.target.is_none());
    }
}
