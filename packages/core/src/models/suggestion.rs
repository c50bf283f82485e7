//! Suggestion results and their presentation.
//!
//! `SuggestionItem` is what the suggester backend returns for a query;
//! `SuggestionEntry` is the flattened row the rendering layer draws.

use crate::utils::format_relative;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search hit from the suggester. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    #[serde(alias = "eid")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Backend type tag, e.g. `essay`
    #[serde(default, rename = "type", alias = "file_type", alias = "fileType")]
    pub item_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, alias = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Soft-deleted documents are hidden from the recent list
    #[serde(default, alias = "is_trash")]
    pub is_trash: bool,
}

/// A page of results for one query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestionPage {
    #[serde(default)]
    pub items: Vec<SuggestionItem>,

    #[serde(default)]
    pub total: u64,
}

/// Row model for one rendered suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionEntry {
    pub id: String,
    pub title: String,
    pub type_tag: String,
    /// `"<relative time> | <summary or type tag>"`
    pub subtitle: String,
}

impl SuggestionEntry {
    pub fn from_item(item: &SuggestionItem, now: DateTime<Utc>, untitled_label: &str) -> Self {
        let title = if item.name.is_empty() {
            untitled_label.to_string()
        } else {
            item.name.clone()
        };

        let detail = match item.summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary,
            _ => item.item_type.as_str(),
        };

        let subtitle = match item.updated_at {
            Some(updated_at) => format!("{} | {}", format_relative(updated_at, now), detail),
            None => detail.to_string(),
        };

        Self {
            id: item.id.clone(),
            title,
            type_tag: item.item_type.clone(),
            subtitle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn item(name: &str, summary: Option<&str>) -> SuggestionItem {
        SuggestionItem {
            id: "doc-1".to_string(),
            name: name.to_string(),
            item_type: "essay".to_string(),
            summary: summary.map(str::to_string),
            updated_at: None,
            is_trash: false,
        }
    }

    #[test]
    fn test_backend_field_spellings() {
        let item: SuggestionItem = serde_json::from_value(json!({
            "eid": "doc-5",
            "name": "Roadmap",
            "file_type": "essay",
            "is_trash": true,
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(item.id, "doc-5");
        assert_eq!(item.item_type, "essay");
        assert!(item.is_trash);
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn test_entry_uses_summary_when_present() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut with_time = item("Roadmap", Some("Q3 plans"));
        with_time.updated_at = Some(now - Duration::hours(2));

        let entry = SuggestionEntry::from_item(&with_time, now, "Untitled");
        assert_eq!(entry.title, "Roadmap");
        assert_eq!(entry.subtitle, "2 hours ago | Q3 plans");
    }

    #[test]
    fn test_entry_falls_back_to_type_and_untitled() {
        let now = Utc::now();
        let entry = SuggestionEntry::from_item(&item("", None), now, "Untitled");
        assert_eq!(entry.title, "Untitled");
        assert_eq!(entry.subtitle, "essay");
    }
}
