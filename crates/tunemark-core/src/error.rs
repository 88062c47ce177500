//! Per-bookmark failure taxonomy.

use crate::tools::ToolError;

/// Why a single bookmark could not be acquired.
///
/// Always caught at the pipeline boundary and turned into a failure record;
/// the traversal itself never sees one of these as a panic or early return.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// The downloader or tagger exited abnormally (or timed out).
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The bookmark URL has no parseable authority segment.
    #[error("cannot parse URL authority: {0}")]
    Parse(String),

    /// A scratch or destination filesystem operation failed.
    #[error("filesystem: {0}")]
    Io(#[from] std::io::Error),
}
