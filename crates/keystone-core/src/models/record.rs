//! Ledger record model.

use serde::{Deserialize, Serialize};

use super::ProjectId;

/// Association between a source document and the project its brief produced.
///
/// A record with neither `project_id` nor `project_name` only marks that a
/// brief was attempted for the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProjectRecord {
    /// Trimmed, non-empty filename; unique within a ledger
    pub filename: String,

    #[serde(default)]
    pub project_id: Option<ProjectId>,

    #[serde(default)]
    pub project_name: Option<String>,
}

impl GeneratedProjectRecord {
    pub fn new(
        filename: impl Into<String>,
        project_id: Option<ProjectId>,
        project_name: Option<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            project_id,
            project_name,
        }
    }

    /// True when the record is tied to no specific project.
    pub fn is_unlinked(&self) -> bool {
        self.project_id.is_none() && self.project_name.is_none()
    }
}
