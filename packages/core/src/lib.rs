//! SmartLink Core - Link Block Logic Layer
//!
//! This crate provides the headless state machine behind an embeddable link
//! block for a block-style rich-text editor: a block that points either at an
//! internal document picked from a suggestion overlay or at an external URL
//! with resolved preview metadata.
//!
//! # Architecture
//!
//! - **Single writer**: the block record is mutated only through the merge
//!   engine's `commit`, funnelled through `RecordService`
//! - **Host seams**: search, metadata resolution, persistence, notifications
//!   and rendering are traits the host editor implements
//! - **Async, not parallel**: handlers are `async` and may overlap; ordering
//!   of suggestion responses is enforced by comparing against the last
//!   dispatched query
//!
//! # Modules
//!
//! - [`models`] - Data structures (BlockRecord, LinkMeta, SuggestionItem)
//! - [`services`] - Merge engine, suggestion controller, fetch orchestrator, `LinkBlock`
//! - [`host`] - Collaborator and view traits, events, in-memory host
//! - [`config`] - Per-block tunables
//! - [`utils`] - Tag stripping, URL heuristic, relative time

pub mod config;
pub mod host;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::LinkBlockConfig;
pub use models::*;
pub use services::*;
