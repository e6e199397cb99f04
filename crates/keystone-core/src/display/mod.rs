//! Display wrapper types for formatting different contexts.
//!
//! Domain models carry no presentation logic. Their `Display` impls live in
//! [`models`], and collections and status messages get dedicated wrapper
//! types, so the same data can be rendered as a list, a progress panel or a
//! one-line confirmation.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Display Wrapper │    │   Formatted     │
//! │ (steps, ledger, │───▶│    Types        │───▶│    Output       │
//! │  outcomes)      │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! All output is markdown, rendered by the CLI through termimad and returned
//! verbatim by the MCP server.
//!
//! ## Wrapper Types
//!
//! - [`Steps`]: progress steps with a completed/total header
//! - [`LedgerEntries`]: generated-project ledger records
//! - [`DocumentEntries`]: documents annotated with their ledger record
//! - [`OperationStatus`]: success, warning and failure messages
//! - [`LocalDateTime`] / [`LocalTime`]: timestamps in the system timezone
//!
//! ## Usage Examples
//!
//! ```rust
//! use keystone_core::display::{LedgerEntries, OperationStatus};
//! use keystone_core::models::GeneratedProjectRecord;
//!
//! let entries = LedgerEntries(vec![GeneratedProjectRecord::new(
//!     "Plan.pdf",
//!     Some(3),
//!     Some("Tower".to_string()),
//! )]);
//! assert!(entries.to_string().contains("Tower (ID: 3)"));
//!
//! let status = OperationStatus::success("Ledger cleared");
//! assert_eq!(status.to_string(), "Success: Ledger cleared\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{DocumentEntries, LedgerEntries, Steps};
pub use datetime::{LocalDateTime, LocalTime};
pub use status::OperationStatus;
