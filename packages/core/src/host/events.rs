//! Domain Events for Link Blocks
//!
//! The record service emits these on a tokio broadcast channel whenever the
//! block's state changes, so hosts (autosave, collaboration, devtools) can
//! observe a block without wrapping its handlers.
//!
//! # Event Flow
//!
//! 1. A commit is merged into the record
//! 2. `RecordCommitted` is emitted with the new record
//! 3. If the commit assigned an identity, `RecordCreated` follows once the
//!    updater has been called (or `CreationFailed` if it errored)
//! 4. `ViewModeChanged` is emitted when a view refresh flips the mode

use crate::host::ViewMode;
use crate::models::BlockRecord;

/// Domain events emitted by a link block's record service.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkBlockEvent {
    /// A commit changed at least one stored field
    RecordCommitted(BlockRecord),

    /// The creation side effect for a newly identified record succeeded
    RecordCreated(BlockRecord),

    /// The creation side effect failed; it is not retried
    CreationFailed { id: String, reason: String },

    /// The rendered view switched modes
    ViewModeChanged(ViewMode),
}

impl LinkBlockEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LinkBlockEvent::RecordCommitted(_) => "record:committed",
            LinkBlockEvent::RecordCreated(_) => "record:created",
            LinkBlockEvent::CreationFailed { .. } => "record:creation-failed",
            LinkBlockEvent::ViewModeChanged(_) => "view:mode-changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let record = BlockRecord::skeleton();
        assert_eq!(
            LinkBlockEvent::RecordCommitted(record.clone()).event_type(),
            "record:committed"
        );
        assert_eq!(
            LinkBlockEvent::RecordCreated(record).event_type(),
            "record:created"
        );
        assert_eq!(
            LinkBlockEvent::CreationFailed {
                id: "x".to_string(),
                reason: "offline".to_string()
            }
            .event_type(),
            "record:creation-failed"
        );
        assert_eq!(
            LinkBlockEvent::ViewModeChanged(ViewMode::Preview).event_type(),
            "view:mode-changed"
        );
    }
}
