//! # Sigil - ABAC Label Tool
//!
//! The main binary for the Sigil label engine.
//!
//! This application provides:
//! - Label parsing and canonicalization
//! - Label evaluation against a local attribute store (TOML)
//! - Hierarchy validation
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │             apps/sigil (THE BINARY)           │
//! │                                               │
//! │   ┌─────────────┐      ┌──────────────────┐   │
//! │   │    CLI      │      │  Attribute store │   │
//! │   │   (clap)    │      │  loader (TOML)   │   │
//! │   └──────┬──────┘      └────────┬─────────┘   │
//! │          │                      │             │
//! │          └──────────┬───────────┘             │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │  sigil-core   │                 │
//! │             │  (THE LOGIC)  │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Canonicalize labels
//! sigil parse 'role=engineer & clearance=secret'
//!
//! # Evaluate a label for a user defined in a store file
//! sigil -S store.toml eval 'clearance = confidential' --user alice
//!
//! # Evaluate against inline attributes
//! sigil eval 'role = engineer' --attributes 'role=engineer, admin'
//!
//! # Validate a hierarchy declaration
//! sigil hierarchy 'clearance: public, confidential, secret'
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — SIGIL_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SIGIL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "sigil=debug"
    } else {
        "sigil=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Sigil startup banner.
fn print_banner() {
    println!(
        r"
  ███████╗██╗ ██████╗ ██╗██╗
  ██╔════╝██║██╔════╝ ██║██║
  ███████╗██║██║  ███╗██║██║
  ╚════██║██║██║   ██║██║██║
  ███████║██║╚██████╔╝██║███████╗
  ╚══════╝╚═╝ ╚═════╝ ╚═╝╚══════╝

  ABAC Label Engine v{}

  Deterministic • Compiled Once • Evaluated Per Request
",
        env!("CARGO_PKG_VERSION")
    );
}
