//! Fetch/Preview Orchestrator
//!
//! Resolves preview metadata for a pasted or typed URL and commits the
//! result as an external (`webs`) link.
//!
//! # Flow
//!
//! 1. Clear the error style. Text that is not URL-shaped sets it again and
//!    stops, without a network call
//! 2. Show the progress indicator and ask the resolver
//! 3. Map the resolved content, or a fallback synthesised from the URL when
//!    nothing usable came back, and commit it
//! 4. Complete the progress indicator and hide it no earlier than the
//!    configured minimum after the fetch started
//! 5. Re-evaluate the view, which switches to the preview
//!
//! An unresolvable URL still produces a committed link. The user gets a
//! warning and the input keeps its error style.

use crate::config::LinkBlockConfig;
use crate::host::{HostServices, LinkView, Notification, ProgressState, SelectionPayload};
use crate::models::{BlockRecord, LinkMeta, TargetType};
use crate::services::{LinkBlockError, RecordService};
use crate::utils::is_url;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Where the URL came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    Paste(String),
    /// Enter pressed on URL-shaped text
    Typed(String),
}

impl FetchSource {
    pub fn text(&self) -> &str {
        match self {
            FetchSource::Paste(text) | FetchSource::Typed(text) => text,
        }
    }
}

/// Result of a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The resolver returned usable metadata
    Resolved(BlockRecord),
    /// Nothing usable came back; the record was built from the URL alone
    Fallback(BlockRecord),
}

impl FetchOutcome {
    pub fn record(&self) -> &BlockRecord {
        match self {
            FetchOutcome::Resolved(record) | FetchOutcome::Fallback(record) => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback(_))
    }
}

pub struct FetchOrchestrator {
    services: HostServices,
    view: Arc<dyn LinkView>,
    records: Arc<RecordService>,
    min_progress: Duration,
    unresolvable_message: String,
}

impl FetchOrchestrator {
    pub fn new(
        services: HostServices,
        view: Arc<dyn LinkView>,
        records: Arc<RecordService>,
        config: &LinkBlockConfig,
    ) -> Self {
        Self {
            services,
            view,
            records,
            min_progress: config.min_progress(),
            unresolvable_message: config.messages.unresolvable_link.clone(),
        }
    }

    pub async fn fetch(&self, source: FetchSource) -> Result<FetchOutcome, LinkBlockError> {
        let url = source.text();
        self.view.set_error(false);

        if !is_url(url) {
            tracing::debug!("Ignoring fetch for non-URL input '{}'", url);
            self.view.set_error(true);
            return Err(LinkBlockError::not_a_url(url));
        }

        tracing::debug!("Fetching link preview for '{}' ({:?})", url, source);
        self.view.set_progress(ProgressState::Loading);
        let started = Instant::now();

        let (content, resolved) = match self.resolve(url).await {
            Some(content) => (content, true),
            None => {
                self.services
                    .notifier
                    .notify(Notification::warning(self.unresolvable_message.clone()));
                self.view.set_error(true);
                (LinkMeta::fallback_for(url), false)
            }
        };

        let mut update = self.services.mapper.map(
            SelectionPayload::Web {
                url,
                content: &content,
            },
            TargetType::Webs,
        );
        update.target_type = Some(TargetType::Webs);

        let committed = self.records.commit(update).await;

        self.view.set_progress(ProgressState::Loaded);
        tokio::time::sleep_until(started + self.min_progress).await;
        self.view.set_progress(ProgressState::Hidden);

        let record = committed?;
        self.records.refresh_view().await;

        if resolved {
            Ok(FetchOutcome::Resolved(record))
        } else {
            Ok(FetchOutcome::Fallback(record))
        }
    }

    /// Usable metadata for `url`, or `None` when the resolver is missing,
    /// failed or came back empty.
    async fn resolve(&self, url: &str) -> Option<LinkMeta> {
        let Some(resolver) = self.services.resolver.clone() else {
            tracing::warn!("Link block resolver is not configured; using fallback for '{}'", url);
            return None;
        };

        match resolver.resolve(url).await {
            Ok(Some(content)) if !content.is_empty() => Some(content),
            Ok(_) => {
                tracing::info!("No preview metadata for '{}'", url);
                None
            }
            Err(e) => {
                tracing::warn!("Resolving '{}' failed: {}", url, e);
                None
            }
        }
    }
}
