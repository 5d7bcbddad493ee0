//! Engine error types.
//!
//! Every error here is local to one file: the batch entry points never
//! propagate a failure across file boundaries (an unreadable file yields an
//! empty record tagged with the error instead).

use std::path::PathBuf;

/// Errors raised while extracting function names from a single file.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
