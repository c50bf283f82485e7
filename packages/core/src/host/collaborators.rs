//! Collaborator Traits - External Services Used by a Link Block
//!
//! The link block never talks to a network or a document store directly. The
//! host editor supplies implementations of these traits through
//! [`HostServices`].
//!
//! # Design Decisions
//!
//! 1. **Async where the host does I/O**: searching, metadata resolution and
//!    persistence are async; document identity, notifications and payload
//!    mapping are plain calls
//! 2. **`anyhow::Result` at the seam**: hosts report failures however they
//!    like; the services log them and degrade, nothing is fatal
//! 3. **Optional collaborators**: a host that leaves out the suggester,
//!    resolver, updater or click handler gets a warning in the log and the
//!    corresponding operation is skipped
//!
//! # Examples
//!
//! ```rust
//! use smartlink_core::host::{DocumentContext, HostServices, Notification, Notifier};
//! use std::sync::Arc;
//!
//! struct Editing(&'static str);
//! impl DocumentContext for Editing {
//!     fn current_doc_id(&self) -> Option<String> {
//!         Some(self.0.to_string())
//!     }
//! }
//!
//! struct Toasts;
//! impl Notifier for Toasts {
//!     fn notify(&self, notification: Notification) {
//!         eprintln!("{:?}: {}", notification.level, notification.message);
//!     }
//! }
//!
//! let services = HostServices::new(Arc::new(Editing("doc-1")), Arc::new(Toasts));
//! assert!(services.suggester.is_none());
//! ```

use crate::models::{
    BlockRecord, LinkMeta, PartialBlockRecord, SuggestionItem, SuggestionPage, TargetType,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Search backend for candidate link targets.
#[async_trait]
pub trait Suggester: Send + Sync {
    /// Search for `query`. An empty query asks for the default/recent set.
    ///
    /// `Ok(None)` means "nothing to show" and leaves the current list alone.
    async fn suggest(&self, query: &str) -> Result<Option<SuggestionPage>>;
}

/// Identity of the document currently open in the editor.
pub trait DocumentContext: Send + Sync {
    fn current_doc_id(&self) -> Option<String>;
}

/// Resolves preview metadata for an external URL.
#[async_trait]
pub trait WebContentResolver: Send + Sync {
    /// `Ok(None)` or an empty meta means the URL could not be resolved.
    async fn resolve(&self, url: &str) -> Result<Option<LinkMeta>>;
}

/// Persistence side effect, invoked once when a record gains its identity.
#[async_trait]
pub trait RecordUpdater: Send + Sync {
    async fn create(&self, record: BlockRecord) -> Result<()>;
}

/// Raw payload chosen by the user, before it is mapped to an update.
#[derive(Debug, Clone, Copy)]
pub enum SelectionPayload<'a> {
    /// A document picked from the suggestion list
    Suggestion(&'a SuggestionItem),
    /// Metadata resolved (or synthesised) for a pasted URL
    Web { url: &'a str, content: &'a LinkMeta },
}

/// Maps a selection payload into the update shape the merge engine consumes.
pub trait SelectionMapper: Send + Sync {
    fn map(&self, payload: SelectionPayload<'_>, target_type: TargetType) -> PartialBlockRecord;
}

/// Mapping used when the host does not provide its own.
///
/// - Suggestions link to the document id and carry name/summary/time as meta
/// - Web content keeps its meta and links to the resolved (or requested) URL;
///   external links have no `target_id`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSelectionMapper;

impl SelectionMapper for DefaultSelectionMapper {
    fn map(&self, payload: SelectionPayload<'_>, target_type: TargetType) -> PartialBlockRecord {
        match payload {
            SelectionPayload::Suggestion(item) => {
                let mut meta = LinkMeta::titled(item.name.clone());
                if let Some(summary) = item.summary.as_deref() {
                    meta.insert("description", summary);
                }
                if let Some(updated_at) = item.updated_at {
                    meta.insert("time", updated_at.to_rfc3339());
                }

                PartialBlockRecord::new()
                    .with_target(item.name.clone())
                    .with_target_id(item.id.clone())
                    .with_target_type(target_type)
                    .with_link(item.id.clone())
                    .with_meta(meta)
            }
            SelectionPayload::Web { url, content } => {
                let link = match content.url() {
                    Some(resolved) if !resolved.is_empty() => resolved.to_string(),
                    _ => url.to_string(),
                };
                let target = match content.title() {
                    Some(title) if !title.is_empty() => title.to_string(),
                    _ => link.clone(),
                };

                let mut meta = content.clone();
                if !meta.contains_key("url") {
                    meta.insert("url", link.clone());
                }

                PartialBlockRecord::new()
                    .with_target(target)
                    .with_target_type(target_type)
                    .with_link(link)
                    .with_meta(meta)
            }
        }
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Toast-level message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type")]
    pub level: NotificationLevel,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// User-facing notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// What the user clicked on in a rendered preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetClick {
    pub target_type: TargetType,
    pub href: String,
    pub target_id: String,
}

/// Navigation hook for preview clicks.
pub trait TargetClickHandler: Send + Sync {
    fn on_target_click(&self, click: TargetClick);
}

/// Bundle of host collaborators handed to a link block.
#[derive(Clone)]
pub struct HostServices {
    pub documents: Arc<dyn DocumentContext>,
    pub notifier: Arc<dyn Notifier>,
    pub mapper: Arc<dyn SelectionMapper>,
    pub suggester: Option<Arc<dyn Suggester>>,
    pub resolver: Option<Arc<dyn WebContentResolver>>,
    pub updater: Option<Arc<dyn RecordUpdater>>,
    pub click_handler: Option<Arc<dyn TargetClickHandler>>,
}

impl HostServices {
    /// Required collaborators only; the rest default to absent and the
    /// mapper to [`DefaultSelectionMapper`].
    pub fn new(documents: Arc<dyn DocumentContext>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            documents,
            notifier,
            mapper: Arc::new(DefaultSelectionMapper),
            suggester: None,
            resolver: None,
            updater: None,
            click_handler: None,
        }
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn Suggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn WebContentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_updater(mut self, updater: Arc<dyn RecordUpdater>) -> Self {
        self.updater = Some(updater);
        self
    }

    pub fn with_mapper(mut self, mapper: Arc<dyn SelectionMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_click_handler(mut self, handler: Arc<dyn TargetClickHandler>) -> Self {
        self.click_handler = Some(handler);
        self
    }

    /// Id of the document being edited, with empty ids treated as unknown.
    pub fn current_doc_id(&self) -> Option<String> {
        self.documents
            .current_doc_id()
            .filter(|doc_id| !doc_id.is_empty())
    }
}
