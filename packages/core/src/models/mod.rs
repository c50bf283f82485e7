//! Data Models
//!
//! This module contains the data structures shared by the link block services:
//!
//! - `BlockRecord` / `PartialBlockRecord` - Persisted block state and its update shape
//! - `LinkMeta` - Preview payload whose presence selects preview mode
//! - `SuggestionItem` / `SuggestionEntry` - Suggester results and rendered rows

mod block_record;
mod link_meta;
mod suggestion;

pub use block_record::{BlockRecord, PartialBlockRecord, TargetType};
pub use link_meta::LinkMeta;
pub use suggestion::{SuggestionEntry, SuggestionItem, SuggestionPage};
