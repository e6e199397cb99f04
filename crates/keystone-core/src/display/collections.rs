//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper renders its items with their own `Display` impl and prints a
//! short notice for an empty collection.

use std::{fmt, ops::Index};

use crate::models::{DocumentEntry, GeneratedProjectRecord, ProgressStep};

/// Newtype wrapper for displaying the steps of a run.
///
/// # Examples
///
/// ```rust
/// use keystone_core::{
///     display::Steps,
///     models::{ProgressStep, StepId, StepStatus},
/// };
///
/// let steps = Steps(vec![
///     ProgressStep::new(StepId::Context, "Preparing document context", StepStatus::Completed),
///     ProgressStep::new(StepId::Project, "Generating project brief", StepStatus::Pending),
/// ]);
/// let output = steps.to_string();
/// assert!(output.contains("Preparing document context (✓ Completed)"));
/// assert!(output.contains("Generating project brief (○ Pending)"));
/// ```
pub struct Steps(pub Vec<ProgressStep>);

/// Newtype wrapper for displaying generated-project ledger records.
pub struct LedgerEntries(pub Vec<GeneratedProjectRecord>);

/// Newtype wrapper for displaying documents with their ledger annotation.
pub struct DocumentEntries(pub Vec<DocumentEntry>);

macro_rules! collection_accessors {
    ($wrapper:ident, $item:ty) => {
        impl $wrapper {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of items in the collection.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $wrapper {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $wrapper {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $wrapper {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

collection_accessors!(Steps, ProgressStep);
collection_accessors!(LedgerEntries, GeneratedProjectRecord);
collection_accessors!(DocumentEntries, DocumentEntry);

impl From<&[GeneratedProjectRecord]> for LedgerEntries {
    fn from(records: &[GeneratedProjectRecord]) -> Self {
        Self(records.to_vec())
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps.");
        }
        for step in &self.0 {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for LedgerEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No generated projects recorded.");
        }
        for record in &self.0 {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DocumentEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No documents found.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
