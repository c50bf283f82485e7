//! Link Block Services
//!
//! This module contains the stateful logic of a link block:
//!
//! - `MergeEngine` - field-by-field merge, identity assignment, self-reference guard
//! - `RecordService` - single writer around the engine; creation side effect and events
//! - `SuggestionController` - debounced queries, stale-response discard, keyboard cursor
//! - `FetchOrchestrator` - URL metadata resolution, fallback records, progress timing
//! - `LinkBlock` - the facade a host editor drives
//!
//! Services talk to the outside world only through the traits in
//! [`crate::host`].

pub mod error;
pub mod fetch_orchestrator;
pub mod link_block;
pub mod merge_engine;
pub mod record_service;
pub mod suggestion_controller;
pub mod suggestion_list;

pub use error::LinkBlockError;
pub use fetch_orchestrator::{FetchOrchestrator, FetchOutcome, FetchSource};
pub use link_block::{Key, KeyInput, KeyOutcome, LinkBlock};
pub use merge_engine::{generate_block_id, CommitOutcome, MergeEngine};
pub use record_service::RecordService;
pub use suggestion_controller::{QueryKind, QueryOutcome, SuggestionController};
pub use suggestion_list::{CursorMove, SuggestionList};
