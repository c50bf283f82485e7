//! Host Integration Seams
//!
//! Everything the link block needs from the surrounding editor lives behind
//! the traits in this module, so the services never touch concrete UI handles
//! or network clients:
//!
//! - [`collaborators`] - Suggester, metadata resolver, persistence, notifications
//! - [`view`] - Rendering layer contract and view-mode state
//! - [`events`] - Domain events broadcast after record changes
//! - [`memory`] - In-memory collaborators and a recording view

pub mod collaborators;
pub mod events;
pub mod memory;
pub mod view;

pub use collaborators::{
    DefaultSelectionMapper, DocumentContext, HostServices, Notification, NotificationLevel,
    Notifier, RecordUpdater, SelectionMapper, SelectionPayload, Suggester, TargetClick,
    TargetClickHandler, WebContentResolver,
};
pub use events::LinkBlockEvent;
pub use view::{LinkView, PreviewModel, ProgressState, ViewMode};
