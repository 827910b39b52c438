//! # Sigil CLI Module
//!
//! This module implements the CLI interface for Sigil.
//!
//! ## Available Commands
//!
//! - `parse` - Parse labels and print their canonical form
//! - `eval` - Evaluate a label against a user or inline attributes
//! - `hierarchy` - Validate a hierarchy declaration
//! - `users` - List the users in the attribute store

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sigil - ABAC label tool
///
/// Parse, canonicalize and evaluate access-control labels over
/// attribute sets and value hierarchies.
#[derive(Parser, Debug)]
#[command(name = "sigil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the attribute store (TOML)
    #[arg(short = 'S', long, global = true)]
    pub store: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse labels and print their canonical form
    Parse {
        /// Label expressions to parse
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Evaluate a label for a user or against inline attributes
    Eval {
        /// Label expression to evaluate
        label: String,

        /// User name, looked up in the attribute store
        #[arg(short, long)]
        user: Option<String>,

        /// Inline attributes, e.g. 'role=engineer, admin'
        #[arg(short, long)]
        attributes: Option<String>,

        /// Hierarchy declaration, e.g. 'clearance: public, secret'
        /// (repeatable; applies on top of the store's hierarchies)
        #[arg(long = "hierarchy")]
        hierarchies: Vec<String>,
    },

    /// Validate a hierarchy declaration
    Hierarchy {
        /// Declaration text, e.g. 'clearance: public, confidential, secret'
        text: String,
    },

    /// List the users defined in the attribute store
    Users,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), AppError> {
    let store = cli.store.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Parse { labels } => cmd_parse(json_mode, &labels),
        Commands::Eval {
            label,
            user,
            attributes,
            hierarchies,
        } => cmd_eval(
            store,
            json_mode,
            &label,
            user.as_deref(),
            attributes.as_deref(),
            &hierarchies,
        ),
        Commands::Hierarchy { text } => cmd_hierarchy(json_mode, &text),
        Commands::Users => cmd_users(store, json_mode),
    }
}
