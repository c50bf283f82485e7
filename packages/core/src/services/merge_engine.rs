//! Identity & Merge Engine
//!
//! Owns the canonical [`BlockRecord`] of one link block and is the only code
//! that writes to it.
//!
//! # Merge Rules
//!
//! - `target`, `target_id`, `target_type`, `link`: a non-empty incoming value
//!   overwrites, an empty or absent one preserves the stored value
//! - `target` has tags stripped *before* the emptiness check, so markup-only
//!   labels never clear a real one
//! - `meta` is replaced wholesale, and only by a non-empty object; its title
//!   and description are tag-stripped
//! - `id` is assigned once, the first time `target_id` is non-empty while no
//!   id exists, and is never reassigned
//!
//! # Identity
//!
//! Ids are random (version 4) UUIDs rendered as hyphen-delimited hex. With 122
//! random bits, the chance of any collision among a billion blocks is below
//! 1e-19; ids are statistically unique, not coordinated.
//!
//! # Examples
//!
//! ```rust
//! use smartlink_core::models::{BlockRecord, PartialBlockRecord};
//! use smartlink_core::services::MergeEngine;
//!
//! let (mut engine, _) = MergeEngine::initialize(BlockRecord::skeleton(), Some("doc-open")).unwrap();
//!
//! let outcome = engine.commit(PartialBlockRecord::new().with_target_id("doc-1"));
//! assert!(outcome.created.is_some());
//!
//! let again = engine.commit(PartialBlockRecord::new().with_target("Renamed"));
//! assert!(again.created.is_none());
//! assert_eq!(again.record.id, outcome.record.id);
//! ```

use crate::models::{BlockRecord, PartialBlockRecord};
use crate::services::LinkBlockError;
use crate::utils::strip_tags;
use uuid::Uuid;

/// Result of merging one partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    /// Record after the merge
    pub record: BlockRecord,

    /// Whether any stored field changed
    pub changed: bool,

    /// Set on the single commit that assigned the record's identity; carries
    /// the fully merged record for the creation side effect
    pub created: Option<BlockRecord>,
}

/// Single writer for a block's record.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    record: BlockRecord,
}

impl MergeEngine {
    /// Build the engine from previously saved (or empty) data.
    ///
    /// Fails with [`LinkBlockError::SelfReference`] when the saved target is
    /// the document currently being edited; no engine exists in that case.
    /// Saved data that has a target but no id is given its identity here,
    /// which the returned outcome reports through `created`.
    pub fn initialize(
        initial: BlockRecord,
        current_doc_id: Option<&str>,
    ) -> Result<(Self, CommitOutcome), LinkBlockError> {
        if let Some(doc_id) = current_doc_id {
            if !initial.target_id.is_empty() && initial.target_id == doc_id {
                return Err(LinkBlockError::self_reference(initial.target_id));
            }
        }

        let mut engine = Self {
            record: BlockRecord::skeleton(),
        };
        let outcome = engine.commit(PartialBlockRecord::from(initial));
        Ok((engine, outcome))
    }

    pub fn record(&self) -> &BlockRecord {
        &self.record
    }

    /// Merge `update` into the stored record.
    ///
    /// Committing the same update twice leaves the record identical after the
    /// second call and reports `changed == false`, `created == None`.
    pub fn commit(&mut self, update: PartialBlockRecord) -> CommitOutcome {
        let mut candidate = self.record.clone();

        // Saved ids are adopted; they never replace an existing one
        if candidate.id.is_none() {
            if let Some(id) = non_empty(update.id) {
                candidate.id = Some(id);
            }
        }

        if let Some(target) = non_empty(update.target.as_deref().map(strip_tags)) {
            candidate.target = target;
        }
        if let Some(target_id) = non_empty(update.target_id) {
            candidate.target_id = target_id;
        }
        if let Some(target_type) = update.target_type.filter(|tag| !tag.is_empty()) {
            candidate.target_type = target_type;
        }
        if let Some(link) = non_empty(update.link) {
            candidate.link = link;
        }
        if let Some(meta) = update.meta.filter(|meta| !meta.is_empty()) {
            candidate.meta = meta.sanitized();
        }

        let mut created = None;
        if candidate.id.is_none() && !candidate.target_id.is_empty() {
            let id = generate_block_id();
            tracing::debug!(
                "Assigned block id '{}' for target '{}'",
                id,
                candidate.target_id
            );
            candidate.id = Some(id);
            created = Some(candidate.clone());
        }

        let changed = candidate != self.record;
        if changed {
            self.record = candidate;
        }

        CommitOutcome {
            record: self.record.clone(),
            changed,
            created,
        }
    }
}

/// Fresh statistically-unique block id.
pub fn generate_block_id() -> String {
    Uuid::new_v4().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "merge_engine_test.rs"]
mod merge_engine_test;
