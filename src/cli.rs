//! Command-line interface for narrator
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Turn articles into narrated audio
#[derive(Parser, Debug)]
#[command(name = "narrator", version, about = "Turn articles into narrated audio")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: stage progress, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log level for the given verbosity flags; `RUST_LOG` takes precedence.
pub fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Parse a timeout string into seconds.
///
/// Supports any duration format accepted by `humantime` (`20s`, `1m30s`)
/// as well as bare numbers of seconds.
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split text into synthesis-sized chunks
    Segment {
        /// Text file to split (default: stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Maximum characters per chunk (default: from config)
        #[arg(long, value_name = "N")]
        max_chars: Option<usize>,

        /// Print each chunk rendered as SSML
        #[arg(long)]
        ssml: bool,
    },

    /// Show which model family an identifier routes to
    Route {
        /// Model identifier, e.g. us.amazon.nova-lite-v1:0
        #[arg(value_name = "MODEL_ID")]
        model_id: String,
    },

    /// Print the rewrite prompt for an article
    Prompt {
        /// Article text file (default: stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Article title
        #[arg(long)]
        title: Option<String>,

        /// Style label
        #[arg(long, default_value = crate::defaults::STYLE)]
        style: String,
    },

    /// Validate a pipeline event and print it normalized
    Validate {
        /// JSON event file (default: stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Check the fields this stage requires (extract, rewrite, synthesize)
        #[arg(long, value_name = "STAGE")]
        stage: Option<String>,
    },

    /// Fetch a web page and store its readable text
    #[cfg(all(feature = "http", feature = "html"))]
    Extract {
        /// Page to fetch (http:// or https://)
        #[arg(value_name = "URL")]
        url: String,

        /// Job identifier (default: random UUID)
        #[arg(long, value_name = "ID")]
        job_id: Option<String>,

        /// Article title carried on the event
        #[arg(long)]
        title: Option<String>,

        /// Root directory for stored artifacts
        #[arg(long, value_name = "DIR", default_value = ".")]
        store: PathBuf,

        /// Fetch timeout (default: from config). Examples: 20s, 1m
        #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
        timeout: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
