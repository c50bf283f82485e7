//! Scripted Link Block Replay
//!
//! Drives a `LinkBlock` against the in-memory host from a JSON script and
//! prints every view call, notification and the final saved record. Useful
//! for reproducing interaction bugs without an editor.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin link-replay -- demos/paste-and-select.json
//!
//! # More or less noise
//! RUST_LOG=link_replay=info,smartlink_core=trace cargo run --bin link-replay -- script.json
//! ```
//!
//! # Script Format
//!
//! ```json
//! {
//!   "config": { "debounceMs": 100 },
//!   "currentDoc": "doc-open",
//!   "initial": { "target": "", "targetId": "", "targetType": "", "link": "", "meta": {} },
//!   "suggestions": { "rep": { "items": [], "total": 0 } },
//!   "webContents": { "https://site.example": { "title": "Site" } },
//!   "events": [
//!     { "type": "focus", "text": "" },
//!     { "type": "input", "text": "rep" },
//!     { "type": "keyDown", "key": "ArrowDown", "text": "rep" },
//!     { "type": "paste", "text": "https://site.example" }
//!   ]
//! }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use smartlink_core::host::memory::{
    CollectingClickHandler, CollectingNotifier, InMemoryResolver, InMemorySuggester,
    InMemoryUpdater, RecordingView, StaticDocument, ViewCommand,
};
use smartlink_core::host::HostServices;
use smartlink_core::{BlockRecord, KeyInput, LinkBlock, LinkBlockConfig, LinkMeta, SuggestionPage};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    #[serde(default)]
    config: Option<serde_json::Value>,
    #[serde(default)]
    current_doc: Option<String>,
    #[serde(default)]
    initial: BlockRecord,
    #[serde(default)]
    suggestions: HashMap<String, SuggestionPage>,
    #[serde(default)]
    web_contents: HashMap<String, LinkMeta>,
    events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ScriptEvent {
    Render,
    Focus {
        #[serde(default)]
        text: String,
    },
    Input {
        text: String,
    },
    Blur,
    KeyDown {
        #[serde(flatten)]
        input: KeyInput,
        #[serde(default)]
        text: String,
    },
    Paste {
        text: String,
    },
    Select {
        index: usize,
    },
    PreviewClick,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StepReport {
    step: usize,
    event: ScriptEvent,
    outcome: String,
    view: Vec<ViewCommand>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("link_replay=debug,smartlink_core=debug")
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: link-replay <script.json>")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read script '{}'", path))?;
    let script: Script =
        serde_json::from_str(&raw).with_context(|| format!("Invalid script '{}'", path))?;

    let config = match script.config {
        Some(value) => LinkBlockConfig::from_json_str(&value.to_string())?,
        None => LinkBlockConfig::default(),
    };

    let documents = match script.current_doc {
        Some(doc_id) => StaticDocument::new(doc_id),
        None => StaticDocument::default(),
    };
    let notifier = Arc::new(CollectingNotifier::default());
    let updater = Arc::new(InMemoryUpdater::default());
    let clicks = Arc::new(CollectingClickHandler::default());
    let view = Arc::new(RecordingView::default());

    let services = HostServices::new(Arc::new(documents), notifier.clone())
        .with_suggester(Arc::new(InMemorySuggester::new(script.suggestions)))
        .with_resolver(Arc::new(InMemoryResolver::new(script.web_contents)))
        .with_updater(updater.clone())
        .with_click_handler(clicks.clone());

    tracing::info!("Replaying {} events from '{}'", script.events.len(), path);
    let block = LinkBlock::new(script.initial, config, services, view.clone()).await;
    if !block.is_usable() {
        tracing::warn!("Block is unusable; events will be ignored");
    }

    let mut reports = Vec::with_capacity(script.events.len());
    for (step, event) in script.events.into_iter().enumerate() {
        let outcome = run_event(&block, &event).await;
        tracing::debug!("Step {}: {:?} -> {}", step, event, outcome);
        reports.push(StepReport {
            step,
            event,
            outcome,
            view: view.take(),
        });
    }
    block.wait_for_pending_creation().await;

    let summary = serde_json::json!({
        "steps": reports,
        "saved": block.save().await,
        "created": updater.created(),
        "notifications": notifier.received(),
        "clicks": clicks.clicks(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

async fn run_event(block: &LinkBlock, event: &ScriptEvent) -> String {
    match event {
        ScriptEvent::Render => format!("{:?}", block.render().await),
        ScriptEvent::Focus { text } => format!("{:?}", block.on_focus(text).await),
        ScriptEvent::Input { text } => format!("{:?}", block.on_input(text).await),
        ScriptEvent::Blur => format!("hidden: {}", block.on_blur().await),
        ScriptEvent::KeyDown { input, text } => {
            format!("{:?}", block.on_key_down(input.clone(), text).await)
        }
        ScriptEvent::Paste { text } => match block.on_paste(text).await {
            Ok(outcome) => format!("{:?}", outcome),
            Err(e) => format!("error: {}", e),
        },
        ScriptEvent::Select { index } => match block.select_suggestion(*index).await {
            Ok(record) => format!("selected '{}'", record.target),
            Err(e) => format!("error: {}", e),
        },
        ScriptEvent::PreviewClick => format!("{:?}", block.on_preview_click().await),
    }
}
