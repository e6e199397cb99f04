//! Generated-project ledger: which source document produced which project.
//!
//! The ledger is an immutable snapshot ([`LedgerRecords`]); every operation
//! returns a snapshot, and returns the *same* `Arc` when nothing changed so
//! consumers can detect changes with [`Arc::ptr_eq`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use keystone_core::{ledger, models::Project};
//!
//! let records = ledger::upsert(&ledger::empty(), "Plan.pdf", Some(Some(3)), Some(Some("Tower".into())));
//! let again = ledger::upsert(&records, "Plan.pdf", Some(Some(3)), Some(Some("Tower".into())));
//! assert!(Arc::ptr_eq(&records, &again));
//!
//! let pruned = ledger::prune(&records, &[Project::named(3, "Tower")]);
//! assert!(Arc::ptr_eq(&records, &pruned));
//! assert!(ledger::prune(&records, &[]).is_empty());
//! ```

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{
    error::Result,
    models::{Document, DocumentEntry, GeneratedProjectRecord, Project, ProjectId},
};

/// Immutable ledger snapshot.
pub type LedgerRecords = Arc<[GeneratedProjectRecord]>;

/// An empty ledger.
pub fn empty() -> LedgerRecords {
    Arc::from(Vec::new())
}

/// Inserts or updates the record for `filename`.
///
/// Field arguments follow patch semantics: `None` keeps the stored value,
/// `Some(None)` clears it and `Some(Some(v))` sets it. A blank filename, or an
/// update that leaves the record value-identical, returns `records` itself.
pub fn upsert(
    records: &LedgerRecords,
    filename: &str,
    project_id: Option<Option<ProjectId>>,
    project_name: Option<Option<String>>,
) -> LedgerRecords {
    let filename = filename.trim();
    if filename.is_empty() {
        return Arc::clone(records);
    }

    let Some(index) = records
        .iter()
        .position(|record| record.filename.trim() == filename)
    else {
        let mut next = records.to_vec();
        next.push(GeneratedProjectRecord::new(
            filename,
            project_id.flatten(),
            project_name.flatten(),
        ));
        return Arc::from(next);
    };

    let current = &records[index];
    let updated = GeneratedProjectRecord {
        filename: current.filename.clone(),
        project_id: project_id.unwrap_or(current.project_id),
        project_name: project_name.unwrap_or_else(|| current.project_name.clone()),
    };
    if updated == *current {
        return Arc::clone(records);
    }

    let mut next = records.to_vec();
    next[index] = updated;
    Arc::from(next)
}

/// Drops records whose project no longer exists.
///
/// A record goes when its filename is blank, when its project id matches no
/// live project, or when its project name matches no live project name
/// (trimmed, case-insensitive). Records tied to no project are kept. Returns
/// `records` itself when nothing is dropped.
pub fn prune(records: &LedgerRecords, live_projects: &[Project]) -> LedgerRecords {
    let live_names: Vec<String> = live_projects
        .iter()
        .map(|project| project.name.trim().to_lowercase())
        .collect();

    let keep = |record: &GeneratedProjectRecord| {
        if record.filename.trim().is_empty() {
            return false;
        }
        if record.is_unlinked() {
            return true;
        }
        if let Some(id) = record.project_id {
            if !live_projects.iter().any(|project| project.id == id) {
                return false;
            }
        }
        if let Some(name) = &record.project_name {
            let name = name.trim().to_lowercase();
            if !live_names.contains(&name) {
                return false;
            }
        }
        true
    };

    if records.iter().all(|record| keep(record)) {
        return Arc::clone(records);
    }

    let kept: Vec<_> = records.iter().filter(|record| keep(*record)).cloned().collect();
    debug!("pruned {} ledger record(s)", records.len() - kept.len());
    Arc::from(kept)
}

/// Parses a stored ledger blob, migrating legacy entries.
///
/// Accepts a JSON array mixing legacy plain filename strings and record
/// objects (`projectId`/`project_id`, `projectName`/`project_name`). Malformed
/// entries are skipped and everything is folded through [`upsert`], so
/// duplicates merge in array order. Unparsable or non-array input yields an
/// empty ledger.
pub fn parse_stored(raw: &str) -> LedgerRecords {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!("ignoring stored ledger: expected an array, found {}", kind(&other));
            return empty();
        }
        Err(e) => {
            warn!("ignoring unparsable stored ledger: {e}");
            return empty();
        }
    };

    entries
        .iter()
        .fold(empty(), |records, entry| match parse_entry(entry) {
            Some(patch) => upsert(&records, &patch.filename, patch.project_id, patch.project_name),
            None => {
                debug!("skipping malformed ledger entry: {entry}");
                records
            }
        })
}

struct EntryPatch {
    filename: String,
    project_id: Option<Option<ProjectId>>,
    project_name: Option<Option<String>>,
}

fn parse_entry(entry: &Value) -> Option<EntryPatch> {
    match entry {
        // Legacy entries only recorded that a brief was generated.
        Value::String(filename) => Some(EntryPatch {
            filename: filename.clone(),
            project_id: None,
            project_name: None,
        }),
        Value::Object(fields) => {
            let filename = fields.get("filename")?.as_str()?.to_string();
            let project_id = field(fields, "projectId", "project_id").and_then(|value| match value {
                Value::Null => Some(None),
                Value::Number(n) => n.as_u64().map(Some),
                Value::String(s) => s.trim().parse().ok().map(Some),
                _ => None,
            });
            let project_name = field(fields, "projectName", "project_name").and_then(|value| match value {
                Value::Null => Some(None),
                Value::String(s) => Some(Some(s.clone())),
                _ => None,
            });

            Some(EntryPatch {
                filename,
                project_id,
                project_name,
            })
        }
        _ => None,
    }
}

fn field<'a>(fields: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    fields.get(camel).or_else(|| fields.get(snake))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Serializes a snapshot into the stored blob format.
pub fn serialize(records: &LedgerRecords) -> Result<String> {
    Ok(serde_json::to_string(&**records)?)
}

/// Looks up the record for a filename.
pub fn find<'a>(records: &'a LedgerRecords, filename: &str) -> Option<&'a GeneratedProjectRecord> {
    let filename = filename.trim();
    records
        .iter()
        .find(|record| record.filename.trim() == filename)
}

/// Pairs each document with its ledger record so a UI can disable or relabel
/// documents that already produced a project.
pub fn annotate(documents: &[Document], records: &LedgerRecords) -> Vec<DocumentEntry> {
    documents
        .iter()
        .map(|document| DocumentEntry {
            document: document.clone(),
            record: find(records, &document.filename).cloned(),
        })
        .collect()
}
