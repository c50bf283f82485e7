//! In-memory host implementations
//!
//! Canned-response collaborators and a recording view. They back the
//! `link-replay` dev tool and the test suites, and are a starting point for
//! headless hosts.

use crate::host::{
    DocumentContext, LinkView, Notification, Notifier, PreviewModel, ProgressState,
    RecordUpdater, Suggester, TargetClick, TargetClickHandler, WebContentResolver,
};
use crate::models::{BlockRecord, LinkMeta, SuggestionEntry, SuggestionPage};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Fixed "currently open" document.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    doc_id: Option<String>,
}

impl StaticDocument {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: Some(doc_id.into()),
        }
    }
}

impl DocumentContext for StaticDocument {
    fn current_doc_id(&self) -> Option<String> {
        self.doc_id.clone()
    }
}

/// Keeps every notification it receives.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn received(&self) -> Vec<Notification> {
        lock(&self.received).clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            "Notification ({:?}): {}",
            notification.level,
            notification.message
        );
        lock(&self.received).push(notification);
    }
}

/// Answers queries from a fixed table; unknown queries return `Ok(None)`.
#[derive(Debug, Default)]
pub struct InMemorySuggester {
    pages: HashMap<String, SuggestionPage>,
    queries: Mutex<Vec<String>>,
}

impl InMemorySuggester {
    pub fn new(pages: HashMap<String, SuggestionPage>) -> Self {
        Self {
            pages,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl Suggester for InMemorySuggester {
    async fn suggest(&self, query: &str) -> Result<Option<SuggestionPage>> {
        lock(&self.queries).push(query.to_string());
        Ok(self.pages.get(query).cloned())
    }
}

/// Resolves URLs from a fixed table; unknown URLs resolve to nothing.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    contents: HashMap<String, LinkMeta>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryResolver {
    pub fn new(contents: HashMap<String, LinkMeta>) -> Self {
        Self {
            contents,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl WebContentResolver for InMemoryResolver {
    async fn resolve(&self, url: &str) -> Result<Option<LinkMeta>> {
        lock(&self.requests).push(url.to_string());
        Ok(self.contents.get(url).cloned())
    }
}

/// Stores created records instead of persisting them.
#[derive(Debug, Default)]
pub struct InMemoryUpdater {
    created: Mutex<Vec<BlockRecord>>,
}

impl InMemoryUpdater {
    pub fn created(&self) -> Vec<BlockRecord> {
        lock(&self.created).clone()
    }
}

#[async_trait]
impl RecordUpdater for InMemoryUpdater {
    async fn create(&self, record: BlockRecord) -> Result<()> {
        lock(&self.created).push(record);
        Ok(())
    }
}

/// Keeps every preview click.
#[derive(Debug, Default)]
pub struct CollectingClickHandler {
    clicks: Mutex<Vec<TargetClick>>,
}

impl CollectingClickHandler {
    pub fn clicks(&self) -> Vec<TargetClick> {
        lock(&self.clicks).clone()
    }
}

impl TargetClickHandler for CollectingClickHandler {
    fn on_target_click(&self, click: TargetClick) {
        lock(&self.clicks).push(click);
    }
}

/// One call made on a [`LinkView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "camelCase")]
pub enum ViewCommand {
    ShowEditing,
    ShowPreview(PreviewModel),
    SetError(bool),
    SetProgress(ProgressState),
    SetSuggestionsVisible(bool),
    RenderSuggestions {
        entries: Vec<SuggestionEntry>,
        active: Option<usize>,
    },
    SetActiveSuggestion(Option<usize>),
    SelectInputContents,
    RemoveBlock,
    BindBlockId(String),
}

/// View that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingView {
    commands: Mutex<Vec<ViewCommand>>,
}

impl RecordingView {
    pub fn commands(&self) -> Vec<ViewCommand> {
        lock(&self.commands).clone()
    }

    /// Drain the recorded commands.
    pub fn take(&self) -> Vec<ViewCommand> {
        std::mem::take(&mut *lock(&self.commands))
    }

    /// Most recent suggestion list render.
    pub fn last_rendered(&self) -> Option<(Vec<SuggestionEntry>, Option<usize>)> {
        lock(&self.commands).iter().rev().find_map(|command| match command {
            ViewCommand::RenderSuggestions { entries, active } => {
                Some((entries.clone(), *active))
            }
            _ => None,
        })
    }

    /// Most recent highlight, from either a render or a cursor move.
    pub fn last_active(&self) -> Option<usize> {
        lock(&self.commands)
            .iter()
            .rev()
            .find_map(|command| match command {
                ViewCommand::RenderSuggestions { active, .. } => Some(*active),
                ViewCommand::SetActiveSuggestion(active) => Some(*active),
                _ => None,
            })
            .flatten()
    }

    pub fn count(&self, matches: impl Fn(&ViewCommand) -> bool) -> usize {
        lock(&self.commands).iter().filter(|c| matches(c)).count()
    }

    fn push(&self, command: ViewCommand) {
        lock(&self.commands).push(command);
    }
}

impl LinkView for RecordingView {
    fn show_editing_view(&self) {
        self.push(ViewCommand::ShowEditing);
    }

    fn show_preview_view(&self, preview: &PreviewModel) {
        self.push(ViewCommand::ShowPreview(preview.clone()));
    }

    fn set_error(&self, error: bool) {
        self.push(ViewCommand::SetError(error));
    }

    fn set_progress(&self, state: ProgressState) {
        self.push(ViewCommand::SetProgress(state));
    }

    fn set_suggestions_visible(&self, visible: bool) {
        self.push(ViewCommand::SetSuggestionsVisible(visible));
    }

    fn render_suggestions(&self, entries: &[SuggestionEntry], active: Option<usize>) {
        self.push(ViewCommand::RenderSuggestions {
            entries: entries.to_vec(),
            active,
        });
    }

    fn set_active_suggestion(&self, active: Option<usize>) {
        self.push(ViewCommand::SetActiveSuggestion(active));
    }

    fn select_input_contents(&self) {
        self.push(ViewCommand::SelectInputContents);
    }

    fn remove_block_and_focus_previous(&self) {
        self.push(ViewCommand::RemoveBlock);
    }

    fn bind_block_id(&self, id: &str) {
        self.push(ViewCommand::BindBlockId(id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_suggester_records_queries() {
        let mut pages = HashMap::new();
        pages.insert("rep".to_string(), SuggestionPage::default());
        let suggester = InMemorySuggester::new(pages);

        assert!(suggester.suggest("rep").await.unwrap().is_some());
        assert!(suggester.suggest("zzz").await.unwrap().is_none());
        assert_eq!(suggester.queries(), vec!["rep", "zzz"]);
    }

    #[test]
    fn test_recording_view_last_active() {
        let view = RecordingView::default();
        view.render_suggestions(&[], Some(0));
        view.set_active_suggestion(Some(2));
        assert_eq!(view.last_active(), Some(2));

        view.render_suggestions(&[], None);
        assert_eq!(view.last_active(), None);
    }

    #[test]
    fn test_view_command_wire_shape() {
        let value = serde_json::to_value(ViewCommand::SetError(true)).unwrap();
        assert_eq!(value["op"], "setError");
        assert_eq!(value["args"], true);
    }
}
