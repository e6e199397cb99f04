//! Thinking feed line model.

use serde::{Deserialize, Serialize};

/// Ephemeral line shown in the thinking feed.
///
/// Lines are identified by `id` so each expiry removes only its own line,
/// even when two visible lines carry the same text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThinkingLine {
    pub id: u64,
    pub text: String,
}
