//! Failure records and the end-of-run report.

use std::fmt::Write as _;

use crate::error::AcquireError;
use crate::store::Bookmark;

/// What went wrong with one bookmark (or one folder).
#[derive(Debug)]
pub enum FailureDetail {
    /// A subprocess exited abnormally; the invoked command and its captured
    /// combined output are retained for manual retry.
    Tool { command: String, output: String },
    /// An internal failure (URL parse, filesystem); message only.
    Internal { message: String },
}

impl From<AcquireError> for FailureDetail {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Tool(tool) => FailureDetail::Tool {
                command: tool.command,
                output: tool.output,
            },
            other => FailureDetail::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// One recorded failure, with enough context for an operator to retry by hand.
#[derive(Debug)]
pub struct FailureRecord {
    /// Folder path relative to the traversal root, `/`-joined; empty string
    /// for the root itself.
    pub folder_path: String,
    /// The affected bookmark; `None` when a whole folder failed (directory
    /// creation) before its bookmarks could be attempted.
    pub bookmark: Option<Bookmark>,
    pub detail: FailureDetail,
}

/// Outcome of a full mirror run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of songs successfully placed.
    pub placed: usize,
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Renders the failure enumeration, one block per record.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.failures.is_empty() {
            return out;
        }
        let _ = writeln!(out, "=== Failed elements ===");
        for record in &self.failures {
            let _ = writeln!(out, "# Folder: {}", record.folder_path);
            match &record.bookmark {
                Some(bookmark) => {
                    let _ = writeln!(out, "# Title: {}", bookmark.title);
                    let _ = writeln!(out, "# URL: {}", bookmark.url);
                }
                None => {
                    let _ = writeln!(out, "# Title: (folder itself)");
                }
            }
            match &record.detail {
                FailureDetail::Tool { command, output } => {
                    let _ = writeln!(out, "# Command: {command}");
                    let _ = writeln!(out, "# Output:\n{}", output.trim_end());
                }
                FailureDetail::Internal { message } => {
                    let _ = writeln!(out, "# Error: {message}");
                }
            }
            let _ = writeln!(out);
        }
        out
    }
}
