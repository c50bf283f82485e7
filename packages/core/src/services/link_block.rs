//! Link Block - one embeddable link block instance
//!
//! Wires the merge engine, the suggestion controller and the fetch
//! orchestrator together behind the handlers a host editor calls: focus,
//! input, blur, key down, paste, suggestion click and preview click.
//!
//! # Lifecycle
//!
//! ```text
//! new(data) ──► self-reference guard ──┬──► usable: render() picks Editing/Preview
//!                                      └──► unusable: error notification, empty block
//! ```
//!
//! Every mutation goes through [`RecordService::commit`]. Read-only blocks
//! render and answer preview clicks but forward or ignore all input.
//!
//! # Keyboard
//!
//! | Key             | Effect                                              |
//! |-----------------|-----------------------------------------------------|
//! | Down / Tab      | next suggestion, wrapping                           |
//! | Up              | previous suggestion, wrapping                       |
//! | Enter           | select the active suggestion, else fetch URL text   |
//! | Backspace       | on empty text: remove the block, focus the previous |
//! | Ctrl/Cmd+A      | select the input contents                           |

use crate::config::LinkBlockConfig;
use crate::host::{
    HostServices, LinkBlockEvent, LinkView, Notification, SelectionPayload, TargetClick, ViewMode,
};
use crate::models::{BlockRecord, SuggestionItem, TargetType};
use crate::services::{
    CursorMove, FetchOrchestrator, FetchOutcome, FetchSource, LinkBlockError, MergeEngine,
    QueryOutcome, RecordService, SuggestionController,
};
use crate::utils::{is_url, Clock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Keyboard key, named the way the DOM `key` property names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Enter,
    ArrowDown,
    ArrowUp,
    Tab,
    Backspace,
    Char(char),
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::from(name.as_str())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Enter => "Enter".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Char(c) => c.to_string(),
            Key::Other(name) => name,
        }
    }
}

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    pub key: Key,

    /// Ctrl on most platforms, Cmd on macOS
    #[serde(default)]
    pub command: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            command: false,
        }
    }

    pub fn with_command(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            command: true,
        }
    }
}

/// Whether a key press was handled by the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOutcome {
    /// Handled here; the host must not apply its default action
    Consumed,
    /// Not ours; the host applies its default action
    Forwarded,
}

pub struct LinkBlock {
    config: LinkBlockConfig,
    services: HostServices,
    view: Arc<dyn LinkView>,
    records: Arc<RecordService>,
    suggestions: SuggestionController,
    fetcher: FetchOrchestrator,
}

impl LinkBlock {
    /// Build a block from saved data (or [`BlockRecord::skeleton`]).
    ///
    /// A block pointing at the document it lives in does not fail to
    /// construct: the user is notified and the block stays empty and inert.
    /// Saved data that already names a target but lacks an id receives one
    /// here, which starts the creation side effect.
    ///
    /// An invalid `config` is logged and replaced by the defaults; only its
    /// `read_only` flag is kept.
    pub async fn new(
        data: BlockRecord,
        mut config: LinkBlockConfig,
        services: HostServices,
        view: Arc<dyn LinkView>,
    ) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("Invalid link block config, using defaults: {}", e);
            config = LinkBlockConfig {
                read_only: config.read_only,
                ..LinkBlockConfig::default()
            };
        }

        let current_doc = services.current_doc_id();

        let (engine, created) = match MergeEngine::initialize(data, current_doc.as_deref()) {
            Ok((engine, outcome)) => (Some(engine), outcome.created),
            Err(e) => {
                tracing::warn!("Link block refused to initialize: {}", e);
                services
                    .notifier
                    .notify(Notification::error(config.messages.self_reference.clone()));
                (None, None)
            }
        };

        let records = Arc::new(RecordService::new(
            engine,
            services.updater.clone(),
            view.clone(),
            config.untitled_label.clone(),
        ));
        if let Some(created) = created {
            records.dispatch_creation(created).await;
        }

        let suggestions = SuggestionController::new(services.clone(), view.clone(), &config);
        let fetcher =
            FetchOrchestrator::new(services.clone(), view.clone(), records.clone(), &config);

        Self {
            config,
            services,
            view,
            records,
            suggestions,
            fetcher,
        }
    }

    /// Replace the clock used for suggestion timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.suggestions = self.suggestions.with_clock(clock);
        self
    }

    pub fn is_usable(&self) -> bool {
        self.records.is_usable()
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Effective configuration after validation.
    pub fn config(&self) -> &LinkBlockConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LinkBlockEvent> {
        self.records.subscribe()
    }

    /// Push the initial view. Unusable blocks show the empty editing view.
    pub async fn render(&self) -> ViewMode {
        match self.records.refresh_view().await {
            Some(mode) => mode,
            None => {
                self.view.show_editing_view();
                ViewMode::Editing
            }
        }
    }

    /// Persisted record; an unusable block saves as an empty skeleton.
    pub async fn save(&self) -> BlockRecord {
        self.records
            .record()
            .await
            .unwrap_or_else(BlockRecord::skeleton)
    }

    pub async fn view_mode(&self) -> Option<ViewMode> {
        self.records.view_mode().await
    }

    pub async fn on_focus(&self, text: &str) -> QueryOutcome {
        if !self.accepts_input() {
            return QueryOutcome::Skipped;
        }
        self.suggestions.on_focus(text).await
    }

    pub async fn on_input(&self, text: &str) -> QueryOutcome {
        if !self.accepts_input() {
            return QueryOutcome::Skipped;
        }
        self.suggestions.on_input(text).await
    }

    pub async fn on_blur(&self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.suggestions.on_blur().await
    }

    /// Handle a key press in the input; `text` is the input's current text.
    pub async fn on_key_down(&self, input: KeyInput, text: &str) -> KeyOutcome {
        if !self.accepts_input() {
            return KeyOutcome::Forwarded;
        }

        match input.key {
            Key::Char('a') | Key::Char('A') if input.command => {
                self.view.select_input_contents();
                KeyOutcome::Consumed
            }
            Key::ArrowDown | Key::Tab => {
                self.suggestions.move_cursor(CursorMove::Next).await;
                KeyOutcome::Consumed
            }
            Key::ArrowUp => {
                self.suggestions.move_cursor(CursorMove::Previous).await;
                KeyOutcome::Consumed
            }
            Key::Enter => {
                self.on_enter(text).await;
                KeyOutcome::Consumed
            }
            Key::Backspace if text.is_empty() => {
                tracing::debug!("Backspace on empty link block input; removing block");
                self.view.remove_block_and_focus_previous();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Forwarded,
        }
    }

    async fn on_enter(&self, text: &str) {
        if let Some(item) = self.suggestions.active_item().await {
            if let Err(e) = self.select_item(item).await {
                tracing::warn!("Selecting the active suggestion failed: {}", e);
            }
            return;
        }

        if is_url(text) {
            if let Err(e) = self.fetch(FetchSource::Typed(text.to_string())).await {
                tracing::warn!("Fetching '{}' failed: {}", text, e);
            }
        }
    }

    /// Paste handler: the clipboard text is fetched as a URL.
    pub async fn on_paste(&self, clipboard: &str) -> Result<FetchOutcome, LinkBlockError> {
        self.ensure_active()?;
        self.fetch(FetchSource::Paste(clipboard.to_string())).await
    }

    /// Commit the rendered suggestion at `index` (mouse click).
    pub async fn select_suggestion(&self, index: usize) -> Result<BlockRecord, LinkBlockError> {
        self.ensure_active()?;
        let item = self.suggestions.item_at(index).await?;
        self.select_item(item).await
    }

    /// Report a click on the rendered preview to the host.
    pub async fn on_preview_click(&self) -> Option<TargetClick> {
        let record = self.records.record().await?;
        let click = TargetClick {
            target_type: record.target_type,
            href: record.link,
            target_id: record.target_id,
        };

        match self.services.click_handler.as_ref() {
            Some(handler) => handler.on_target_click(click.clone()),
            None => tracing::warn!("Link block click handler is not configured; ignoring click"),
        }

        Some(click)
    }

    /// Wait for an in-flight creation side effect, if any.
    pub async fn wait_for_pending_creation(&self) {
        self.records.wait_for_pending_creation().await;
    }

    async fn select_item(&self, item: SuggestionItem) -> Result<BlockRecord, LinkBlockError> {
        tracing::debug!("Selecting suggestion '{}' ({})", item.name, item.id);
        let target_type = TargetType::from(item.item_type.as_str());
        let update = self
            .services
            .mapper
            .map(SelectionPayload::Suggestion(&item), target_type);

        let record = self.records.commit(update).await?;
        self.suggestions.dismiss().await;
        self.records.refresh_view().await;
        Ok(record)
    }

    async fn fetch(&self, source: FetchSource) -> Result<FetchOutcome, LinkBlockError> {
        let outcome = self.fetcher.fetch(source).await?;
        self.suggestions.dismiss().await;
        Ok(outcome)
    }

    fn accepts_input(&self) -> bool {
        self.records.is_usable() && !self.config.read_only
    }

    fn ensure_active(&self) -> Result<(), LinkBlockError> {
        if self.config.read_only {
            return Err(LinkBlockError::ReadOnly);
        }
        if !self.records.is_usable() {
            return Err(LinkBlockError::Uninitialized);
        }
        Ok(())
    }
}
