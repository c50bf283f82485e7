//! Record Service - the single writer behind a link block
//!
//! Wraps the [`MergeEngine`] so that every handler (suggestion selection,
//! fetch completion, initial load) funnels mutations through one place, then
//! fans the results out:
//!
//! - dispatches the creation side effect to the host's [`RecordUpdater`]
//! - broadcasts [`LinkBlockEvent`]s
//! - re-evaluates the view mode on request
//!
//! # Creation Side Effect
//!
//! The updater is invoked on a spawned task so a slow backend never blocks
//! the UI path. Failures are logged and reported as `CreationFailed`; they are
//! not retried. A missing updater is a host misconfiguration: it is logged at
//! `warn` and the call is skipped.

use crate::host::{LinkBlockEvent, LinkView, PreviewModel, RecordUpdater, ViewMode};
use crate::models::{BlockRecord, PartialBlockRecord};
use crate::services::{LinkBlockError, MergeEngine};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

/// Capacity of the event channel; slow subscribers lag rather than block.
const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct RecordService {
    /// `None` when the block refused to initialize
    engine: Mutex<Option<MergeEngine>>,
    usable: bool,
    updater: Option<Arc<dyn RecordUpdater>>,
    view: Arc<dyn LinkView>,
    untitled_label: String,
    mode: Mutex<Option<ViewMode>>,
    creation_task: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<LinkBlockEvent>,
}

impl RecordService {
    pub fn new(
        engine: Option<MergeEngine>,
        updater: Option<Arc<dyn RecordUpdater>>,
        view: Arc<dyn LinkView>,
        untitled_label: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            usable: engine.is_some(),
            engine: Mutex::new(engine),
            updater,
            view,
            untitled_label: untitled_label.into(),
            mode: Mutex::new(None),
            creation_task: Mutex::new(None),
            events,
        }
    }

    /// Subscribe to this block's domain events.
    pub fn subscribe(&self) -> broadcast::Receiver<LinkBlockEvent> {
        self.events.subscribe()
    }

    pub fn is_usable(&self) -> bool {
        self.usable
    }

    /// Current record, or `None` for an uninitialized block.
    pub async fn record(&self) -> Option<BlockRecord> {
        self.engine
            .lock()
            .await
            .as_ref()
            .map(|engine| engine.record().clone())
    }

    /// Merge `update` into the record.
    ///
    /// Emits `RecordCommitted` when something changed and starts the creation
    /// side effect when this commit assigned the record's identity.
    pub async fn commit(&self, update: PartialBlockRecord) -> Result<BlockRecord, LinkBlockError> {
        let outcome = {
            let mut guard = self.engine.lock().await;
            let engine = guard.as_mut().ok_or(LinkBlockError::Uninitialized)?;
            engine.commit(update)
        };

        if outcome.changed {
            tracing::debug!(
                "Committed link block record (id: {:?}, target: '{}')",
                outcome.record.id,
                outcome.record.target
            );
            self.emit(LinkBlockEvent::RecordCommitted(outcome.record.clone()));
        }

        if let Some(created) = outcome.created {
            self.dispatch_creation(created).await;
        }

        Ok(outcome.record)
    }

    /// Hand a freshly identified record to the updater, exactly once.
    pub(crate) async fn dispatch_creation(&self, record: BlockRecord) {
        let Some(updater) = self.updater.clone() else {
            tracing::warn!(
                "Link block updater is not configured; skipping create for block {:?}",
                record.id
            );
            return;
        };

        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let id = record.id.clone().unwrap_or_default();
            match updater.create(record.clone()).await {
                Ok(()) => {
                    tracing::info!("Created link block '{}'", id);
                    let _ = events.send(LinkBlockEvent::RecordCreated(record));
                }
                Err(e) => {
                    let error = LinkBlockError::collaborator("updater", e.to_string());
                    tracing::warn!("Creating link block '{}' failed: {}", id, error);
                    let _ = events.send(LinkBlockEvent::CreationFailed {
                        id,
                        reason: error.to_string(),
                    });
                }
            }
        });

        *self.creation_task.lock().await = Some(handle);
    }

    /// Wait for an in-flight creation call, if any.
    pub async fn wait_for_pending_creation(&self) {
        let handle = self.creation_task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("Link block creation task did not complete: {}", e);
            }
        }
    }

    /// Re-evaluate the view mode and push the matching view.
    ///
    /// Returns the mode now shown, or `None` for an uninitialized block.
    pub async fn refresh_view(&self) -> Option<ViewMode> {
        let record = self.record().await?;

        if let Some(id) = record.id.as_deref() {
            self.view.bind_block_id(id);
        }

        let mode = ViewMode::for_record(&record);
        match mode {
            ViewMode::Preview => {
                let preview = PreviewModel::from_record(&record, &self.untitled_label);
                self.view.show_preview_view(&preview);
            }
            ViewMode::Editing => self.view.show_editing_view(),
        }

        let previous = self.mode.lock().await.replace(mode);
        if previous != Some(mode) {
            tracing::debug!("Link block view mode {:?} -> {:?}", previous, mode);
            self.emit(LinkBlockEvent::ViewModeChanged(mode));
        }

        Some(mode)
    }

    /// Mode last pushed to the view.
    pub async fn view_mode(&self) -> Option<ViewMode> {
        *self.mode.lock().await
    }

    fn emit(&self, event: LinkBlockEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkMeta, SuggestionEntry};
    use crate::host::ProgressState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{timeout, Duration};

    #[derive(Default)]
    struct CountingView {
        previews: AtomicUsize,
        editing: AtomicUsize,
    }

    impl LinkView for CountingView {
        fn show_editing_view(&self) {
            self.editing.fetch_add(1, Ordering::SeqCst);
        }
        fn show_preview_view(&self, _preview: &PreviewModel) {
            self.previews.fetch_add(1, Ordering::SeqCst);
        }
        fn set_error(&self, _error: bool) {}
        fn set_progress(&self, _state: ProgressState) {}
        fn set_suggestions_visible(&self, _visible: bool) {}
        fn render_suggestions(&self, _entries: &[SuggestionEntry], _active: Option<usize>) {}
        fn set_active_suggestion(&self, _active: Option<usize>) {}
        fn select_input_contents(&self) {}
        fn remove_block_and_focus_previous(&self) {}
        fn bind_block_id(&self, _id: &str) {}
    }

    #[derive(Default)]
    struct CountingUpdater {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RecordUpdater for CountingUpdater {
        async fn create(&self, _record: BlockRecord) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("backend offline");
            }
            Ok(())
        }
    }

    fn service(updater: Option<Arc<CountingUpdater>>) -> (RecordService, Arc<CountingView>) {
        let (engine, _) = MergeEngine::initialize(BlockRecord::skeleton(), None).unwrap();
        let view = Arc::new(CountingView::default());
        let updater = updater.map(|u| u as Arc<dyn RecordUpdater>);
        (
            RecordService::new(Some(engine), updater, view.clone(), "Untitled"),
            view,
        )
    }

    #[tokio::test]
    async fn test_creation_dispatched_once() {
        let updater = Arc::new(CountingUpdater::default());
        let (service, _view) = service(Some(updater.clone()));

        service
            .commit(PartialBlockRecord::new().with_target_id("doc-1"))
            .await
            .unwrap();
        service.wait_for_pending_creation().await;
        service
            .commit(PartialBlockRecord::new().with_target("Renamed"))
            .await
            .unwrap();
        service.wait_for_pending_creation().await;

        assert_eq!(updater.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_creation_failure_is_reported_not_fatal() {
        let updater = Arc::new(CountingUpdater {
            fail: true,
            ..Default::default()
        });
        let (service, _view) = service(Some(updater.clone()));
        let mut rx = service.subscribe();

        let record = service
            .commit(PartialBlockRecord::new().with_target_id("doc-1"))
            .await
            .unwrap();
        service.wait_for_pending_creation().await;

        // RecordCommitted first, then the failure
        let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(first.event_type(), "record:committed");
        let second = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        match second {
            LinkBlockEvent::CreationFailed { id, reason } => {
                assert_eq!(Some(id), record.id);
                assert!(reason.contains("backend offline"));
            }
            other => panic!("Expected CreationFailed, got {:?}", other),
        }

        // The record itself is untouched by the failure
        assert_eq!(service.record().await, Some(record));
    }

    #[tokio::test]
    async fn test_missing_updater_is_skipped() {
        let (service, _view) = service(None);

        let record = service
            .commit(PartialBlockRecord::new().with_target_id("doc-1"))
            .await
            .unwrap();
        service.wait_for_pending_creation().await;

        assert!(record.id.is_some());
    }

    #[tokio::test]
    async fn test_uninitialized_service_rejects_commits() {
        let view = Arc::new(CountingView::default());
        let service = RecordService::new(None, None, view, "Untitled");

        let result = service.commit(PartialBlockRecord::new().with_target("x")).await;
        assert!(matches!(result, Err(LinkBlockError::Uninitialized)));
        assert!(service.refresh_view().await.is_none());
        assert!(!service.is_usable());
    }

    #[tokio::test]
    async fn test_refresh_view_tracks_mode_changes() {
        let (service, view) = service(None);
        let mut rx = service.subscribe();

        assert_eq!(service.refresh_view().await, Some(ViewMode::Editing));
        service
            .commit(PartialBlockRecord::new().with_meta(LinkMeta::titled("Page")))
            .await
            .unwrap();
        assert_eq!(service.refresh_view().await, Some(ViewMode::Preview));
        // Same mode again: view refreshed, no new event
        assert_eq!(service.refresh_view().await, Some(ViewMode::Preview));

        assert_eq!(view.editing.load(Ordering::SeqCst), 1);
        assert_eq!(view.previews.load(Ordering::SeqCst), 2);

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.event_type().to_string());
        }
        assert_eq!(
            kinds,
            vec!["view:mode-changed", "record:committed", "view:mode-changed"]
        );
    }
}
