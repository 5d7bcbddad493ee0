//! Extraction of function definition names from C source files.
//!
//! The engine works without a preprocessor or a real C grammar. Per file
//! it runs two independent recognition strategies and reconciles them:
//!
//! 1. a token pass: a C-aware lexer with opaque `{...}` block capture
//!    feeds a paren/bracket-depth candidate state machine ([`recognizer`]);
//! 2. a text pass: a character-level scan of the raw source with the
//!    same candidate logic plus brace-depth tracking ([`textscan`]).
//!
//! Both passes share one [`macros::MacroTable`] built from the file's
//! `#define` lines, so `##`-pasting macros that generate whole function
//! definitions (or rename a declarator) resolve to real names at their
//! call sites.
//!
//! All state is scoped to a single [`extract_from_source`] call; batch
//! entry points process files independently and never abort on a bad
//! file.

pub mod error;
pub mod keywords;
pub mod lexer;
pub mod macros;
pub mod merge;
pub mod recognizer;
pub mod report;
pub mod textscan;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::EngineError;
pub use report::FileRecord;

use crate::macros::MacroTable;

/// Extract the ordered list of function definition names from one file's
/// source text. Pure and self-contained; safe to call concurrently.
#[must_use]
pub fn extract_from_source(source: &str) -> Vec<String> {
    let tokens = lexer::tokenize(source);
    let macros = MacroTable::from_tokens(&tokens);

    let token_pass = recognizer::recognize(source, &tokens, &macros);
    if token_pass.anomalies > 0 {
        tracing::debug!(
            anomalies = token_pass.anomalies,
            "token pass hit unmatched closers"
        );
    }

    let scan = textscan::scan(source, &macros);
    merge::reconcile(&token_pass.names, &scan)
}

/// Read and process one file. An unreadable file yields a record with an
/// empty name list and the error text, never an `Err` to the caller.
#[must_use]
pub fn parse_file(path: &Path) -> FileRecord {
    match fs::read(path) {
        Ok(bytes) => {
            let source = String::from_utf8_lossy(&bytes);
            FileRecord::new(path, extract_from_source(&source))
        }
        Err(source) => {
            let err = EngineError::Read {
                path: path.to_path_buf(),
                source,
            };
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
            FileRecord::failed(path, err.to_string())
        }
    }
}

/// Process a batch of files, one record per path, in submission order.
/// Each file starts from fresh state; a failure affects only its own
/// record.
#[must_use]
pub fn parse_batch<I>(paths: I) -> Vec<FileRecord>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths.into_iter().map(|path| parse_file(&path)).collect()
}
