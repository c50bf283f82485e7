//! Rendering Layer Contract
//!
//! The services drive the UI exclusively through [`LinkView`]. Implementations
//! own the actual widgets (DOM nodes, terminal cells, test recorders) and must
//! not call back into the block synchronously.

use crate::models::{BlockRecord, LinkMeta, SuggestionEntry, TargetType};
use serde::{Deserialize, Serialize};

/// The two mutually exclusive presentations of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Input field and suggestion overlay
    Editing,
    /// Rendered anchor
    Preview,
}

impl ViewMode {
    /// Meta presence is the only input to this decision.
    pub fn for_record(record: &BlockRecord) -> Self {
        if record.has_preview() {
            ViewMode::Preview
        } else {
            ViewMode::Editing
        }
    }
}

/// Progress indicator states while a URL is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    Hidden,
    Loading,
    Loaded,
}

/// Everything the preview anchor displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewModel {
    pub title: String,
    pub href: String,
    pub target_type: TargetType,
    pub target_id: String,
    pub meta: LinkMeta,
}

impl PreviewModel {
    pub fn from_record(record: &BlockRecord, untitled_label: &str) -> Self {
        Self {
            title: record.display_target(untitled_label).to_string(),
            href: record.link.clone(),
            target_type: record.target_type.clone(),
            target_id: record.target_id.clone(),
            meta: record.meta.clone(),
        }
    }
}

/// Rendering surface for one link block.
pub trait LinkView: Send + Sync {
    /// Show the input holder and hide the preview.
    fn show_editing_view(&self);

    /// Remove the input holder and show the preview anchor.
    fn show_preview_view(&self, preview: &PreviewModel);

    /// Toggle the input error style.
    fn set_error(&self, error: bool);

    fn set_progress(&self, state: ProgressState);

    fn set_suggestions_visible(&self, visible: bool);

    /// Replace the suggestion list; `active` is the highlighted row, if any.
    fn render_suggestions(&self, entries: &[SuggestionEntry], active: Option<usize>);

    /// Move the highlight without rebuilding the list.
    fn set_active_suggestion(&self, active: Option<usize>);

    /// Select the whole content of the input (Ctrl/Cmd+A).
    fn select_input_contents(&self);

    /// Delete this block from the editor and put the caret in the previous one.
    fn remove_block_and_focus_previous(&self);

    /// Expose the record id on the rendered wrapper.
    fn bind_block_id(&self, id: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mode_follows_meta_presence() {
        let mut record = BlockRecord::skeleton();
        assert_eq!(ViewMode::for_record(&record), ViewMode::Editing);

        record.meta = LinkMeta::titled("Page");
        assert_eq!(ViewMode::for_record(&record), ViewMode::Preview);
    }

    #[test]
    fn test_preview_model_uses_untitled_label() {
        let mut record = BlockRecord::skeleton();
        record.link = "https://site.example".to_string();
        record.meta = LinkMeta::titled("");

        let preview = PreviewModel::from_record(&record, "Untitled");
        assert_eq!(preview.title, "Untitled");
        assert_eq!(preview.href, "https://site.example");
    }
}
