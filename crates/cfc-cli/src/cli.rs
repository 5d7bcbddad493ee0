use std::path::PathBuf;

use clap::Parser;

/// Collect C function definition names across a source tree.
///
/// Scans a directory recursively for `.c` files, extracts the functions
/// each file defines (macro-generated definitions included), and writes
/// the per-file map to `fc.json` plus the list of files defining nothing
/// to `null_fc.json`.
#[derive(Debug, Parser)]
#[command(name = "cfc", version, arg_required_else_help = true)]
pub struct Cli {
    /// Directory to scan recursively for .c files
    pub dir: PathBuf,

    /// Worker threads (default: CPU count - 1)
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Output path for the per-file function map
    #[arg(long, value_name = "PATH", default_value = "fc.json")]
    pub output_fc: PathBuf,

    /// Output path for the list of files without definitions
    #[arg(long, value_name = "PATH", default_value = "null_fc.json")]
    pub output_null_fc: PathBuf,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
