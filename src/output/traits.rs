//! Output sink trait and error types

use crate::record::Character;
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination of an aggregated roster
pub trait OutputSink {
    /// Writes the records, replacing any previous contents
    ///
    /// # Arguments
    ///
    /// * `characters` - Records in the order they should be written
    fn save(&self, characters: &[Character]) -> OutputResult<()>;
}
