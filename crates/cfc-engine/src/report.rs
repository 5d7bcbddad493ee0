//! Per-file result record.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Everything the engine reports for one file: the path, the ordered
/// function names (serialized under the downstream key `fc`), and an
/// optional error note when the file could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    #[serde(rename = "fc")]
    pub functions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl FileRecord {
    #[must_use]
    pub fn new(path: &Path, functions: Vec<String>) -> Self {
        Self {
            path: path.display().to_string(),
            functions,
            error: None,
        }
    }

    /// A record for a file that could not be processed: empty name list
    /// plus the error text for the orchestration layer to log.
    #[must_use]
    pub fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            functions: Vec::new(),
            error: Some(error),
        }
    }

    /// True when the file defines no functions.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.functions.is_empty()
    }
}
