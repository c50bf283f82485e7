//! Suggestion Query Controller
//!
//! Turns keystrokes into suggester queries and keeps the rendered list plus
//! its navigation cursor.
//!
//! # Query Discipline
//!
//! - **Debounce**: [`on_input`](SuggestionController::on_input) waits for the
//!   configured quiet window; only the last keystroke inside it dispatches
//! - **Duplicate suppression**: a typed query equal to the last dispatched one
//!   is not sent again
//! - **Ordering**: a response is applied only if its query is still the last
//!   dispatched query. Superseded calls are never cancelled; their results are
//!   dropped on arrival
//!
//! # Filtering
//!
//! The document currently open in the editor is never suggested. The recent
//! list requested on focus additionally hides soft-deleted documents.
//!
//! # Default Cursor
//!
//! A typed, non-URL query highlights the first result so Enter picks it. URL
//! text and the recent list start with nothing highlighted, so Enter on a
//! pasted URL fetches it instead of selecting a document.

use crate::config::LinkBlockConfig;
use crate::host::{HostServices, LinkView};
use crate::models::{SuggestionEntry, SuggestionItem};
use crate::services::suggestion_list::{CursorMove, SuggestionList};
use crate::services::LinkBlockError;
use crate::utils::{is_url, Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Which path produced a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Text typed (or pasted) into the input
    Typed,
    /// Default/recent set requested when focusing an empty input
    Recent,
}

/// What happened to one query request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The list was rebuilt from the response
    Applied { query: String, count: usize },
    /// A newer keystroke arrived inside the debounce window
    Superseded,
    /// Same text as the last dispatched query
    Suppressed,
    /// A newer query was dispatched while this one was in flight
    Stale,
    /// The suggester returned nothing; the list was left alone
    Unchanged,
    /// The suggester failed; the list was left alone
    Failed,
    /// No suggester is configured
    Skipped,
}

#[derive(Debug, Default)]
struct QueryState {
    keystrokes: u64,
    focus_generation: u64,
    last_dispatched: Option<String>,
    list: SuggestionList,
}

pub struct SuggestionController {
    services: HostServices,
    view: Arc<dyn LinkView>,
    clock: Arc<dyn Clock>,
    debounce: Duration,
    blur_hide_delay: Duration,
    untitled_label: String,
    state: Mutex<QueryState>,
}

impl SuggestionController {
    pub fn new(services: HostServices, view: Arc<dyn LinkView>, config: &LinkBlockConfig) -> Self {
        Self {
            services,
            view,
            clock: Arc::new(SystemClock),
            debounce: config.debounce(),
            blur_hide_delay: config.blur_hide_delay(),
            untitled_label: config.untitled_label.clone(),
            state: Mutex::new(QueryState::default()),
        }
    }

    /// Replace the clock used for relative timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Keystroke handler; resolves once this keystroke's query settled.
    pub async fn on_input(&self, text: &str) -> QueryOutcome {
        let ticket = {
            let mut state = self.state.lock().await;
            state.keystrokes += 1;
            state.keystrokes
        };

        tokio::time::sleep(self.debounce).await;

        if self.state.lock().await.keystrokes != ticket {
            return QueryOutcome::Superseded;
        }

        self.dispatch(text, QueryKind::Typed).await
    }

    /// Show the overlay; an empty input loads the recent set and a non-empty
    /// one rebuilds the list for its text.
    pub async fn on_focus(&self, text: &str) -> QueryOutcome {
        self.state.lock().await.focus_generation += 1;
        self.view.set_suggestions_visible(true);

        if text.trim().is_empty() {
            self.dispatch(text, QueryKind::Recent).await
        } else {
            self.dispatch(text, QueryKind::Typed).await
        }
    }

    /// Hide the overlay after the blur delay unless the input was refocused.
    ///
    /// Returns true when the overlay was hidden. Hiding discards the list and
    /// forgets the last query, so the next focus or keystroke re-queries.
    pub async fn on_blur(&self) -> bool {
        let generation = self.state.lock().await.focus_generation;

        tokio::time::sleep(self.blur_hide_delay).await;

        let mut state = self.state.lock().await;
        if state.focus_generation != generation {
            return false;
        }
        state.list = SuggestionList::default();
        state.last_dispatched = None;
        self.view.set_suggestions_visible(false);
        true
    }

    /// Send `query` to the suggester and apply the response if still current.
    pub async fn dispatch(&self, query: &str, kind: QueryKind) -> QueryOutcome {
        let Some(suggester) = self.services.suggester.clone() else {
            tracing::warn!("Link block suggester is not configured; skipping query");
            return QueryOutcome::Skipped;
        };

        {
            let mut state = self.state.lock().await;
            if kind == QueryKind::Typed && state.last_dispatched.as_deref() == Some(query) {
                tracing::debug!("Suppressed duplicate suggestion query '{}'", query);
                return QueryOutcome::Suppressed;
            }
            state.last_dispatched = Some(query.to_string());
        }

        tracing::debug!("Dispatching suggestion query '{}' ({:?})", query, kind);
        let page = match suggester.suggest(query).await {
            Ok(Some(page)) => page,
            Ok(None) => return QueryOutcome::Unchanged,
            Err(e) => {
                tracing::warn!("Suggestion query '{}' failed: {}", query, e);
                return QueryOutcome::Failed;
            }
        };

        let mut state = self.state.lock().await;
        if state.last_dispatched.as_deref() != Some(query) {
            tracing::debug!(
                "Discarding stale suggestions for '{}' (latest is {:?})",
                query,
                state.last_dispatched
            );
            return QueryOutcome::Stale;
        }

        let current_doc = self.services.current_doc_id();
        let items: Vec<SuggestionItem> = page
            .items
            .into_iter()
            .filter(|item| current_doc.as_deref() != Some(item.id.as_str()))
            .filter(|item| kind == QueryKind::Typed || !item.is_trash)
            .collect();

        let activate_first = kind == QueryKind::Typed && !is_url(query);
        state.list = SuggestionList::new(items, activate_first);

        let now = self.clock.now();
        let entries: Vec<SuggestionEntry> = state
            .list
            .items()
            .iter()
            .map(|item| SuggestionEntry::from_item(item, now, &self.untitled_label))
            .collect();
        self.view.render_suggestions(&entries, state.list.active());

        QueryOutcome::Applied {
            query: query.to_string(),
            count: entries.len(),
        }
    }

    /// Move the highlight; returns the new active index.
    pub async fn move_cursor(&self, direction: CursorMove) -> Option<usize> {
        let mut state = self.state.lock().await;
        if state.list.is_empty() {
            return None;
        }
        let active = state.list.move_cursor(direction);
        self.view.set_active_suggestion(active);
        active
    }

    pub async fn active_item(&self) -> Option<SuggestionItem> {
        self.state.lock().await.list.active_item().cloned()
    }

    pub async fn active_index(&self) -> Option<usize> {
        self.state.lock().await.list.active()
    }

    pub async fn item_at(&self, index: usize) -> Result<SuggestionItem, LinkBlockError> {
        let state = self.state.lock().await;
        state
            .list
            .get(index)
            .cloned()
            .ok_or(LinkBlockError::SuggestionOutOfRange {
                index,
                len: state.list.len(),
            })
    }

    /// Snapshot of the rendered items.
    pub async fn items(&self) -> Vec<SuggestionItem> {
        self.state.lock().await.list.items().to_vec()
    }

    /// Drop the list after a selection was committed.
    pub async fn dismiss(&self) {
        let mut state = self.state.lock().await;
        state.list = SuggestionList::default();
        state.last_dispatched = None;
        self.view.render_suggestions(&[], None);
        self.view.set_suggestions_visible(false);
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "suggestion_controller_test.rs"]
mod suggestion_controller_test;
