//! Service Layer Error Types
//!
//! Every failure in the link block degrades to a visible, re-editable state;
//! these errors describe *why* an operation did nothing so callers can log or
//! test it. None of them should be treated as fatal.

use thiserror::Error;

/// Link block operation errors
#[derive(Error, Debug)]
pub enum LinkBlockError {
    /// The block would link to the document it is embedded in
    #[error("Self-referential link: target '{target_id}' is the current document")]
    SelfReference { target_id: String },

    /// Pasted or typed text does not look like a URL
    #[error("Not a URL: {input}")]
    NotAUrl { input: String },

    /// The block refused to initialize and accepts no commits
    #[error("Link block is not initialized")]
    Uninitialized,

    /// Input handlers are disabled on read-only blocks
    #[error("Link block is read-only")]
    ReadOnly,

    /// Suggestion index does not exist in the rendered list
    #[error("No suggestion at index {index} (list has {len})")]
    SuggestionOutOfRange { index: usize, len: usize },

    /// A host collaborator failed or is missing
    #[error("Collaborator '{collaborator}' failed: {reason}")]
    Collaborator {
        collaborator: &'static str,
        reason: String,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LinkBlockError {
    /// Create a self-reference error
    pub fn self_reference(target_id: impl Into<String>) -> Self {
        Self::SelfReference {
            target_id: target_id.into(),
        }
    }

    /// Create a not-a-URL error
    pub fn not_a_url(input: impl Into<String>) -> Self {
        Self::NotAUrl {
            input: input.into(),
        }
    }

    /// Create a collaborator error
    pub fn collaborator(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator,
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Validation failures are shown to the user; everything else is logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::SelfReference { .. } | Self::NotAUrl { .. })
    }
}
