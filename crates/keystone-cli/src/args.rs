use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keystone_core::client::DEFAULT_API_URL;

use crate::cli::{ConversationCommands, GenerateArgs, LedgerCommands};

/// Generate project briefs and task sets from planning documents
///
/// Keystone sends an uploaded document to the backend's AI endpoints, shows
/// live progress while the brief and task sets are produced, and remembers
/// which document generated which project. It runs as a command-line tool or
/// as an MCP (Model Context Protocol) server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "keystone")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/keystone/keystone.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Base URL of the document and project backend
    #[arg(long, global = true, env = "KEYSTONE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Keystone CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a project brief and/or task sets from a document
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// List uploaded documents and the projects generated from them
    #[command(alias = "d")]
    Documents,
    /// Inspect or maintain the generated-project ledger
    #[command(alias = "l")]
    Ledger {
        #[command(subcommand)]
        command: LedgerCommands,
    },
    /// Manage the active conversation id
    Conversation {
        #[command(subcommand)]
        command: ConversationCommands,
    },
    /// Start the MCP server
    Serve,
}
