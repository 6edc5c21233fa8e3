use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the data layer.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Failure while loading or querying an inventory file.
///
/// There is no partial-success mode: the first bad row aborts the whole load
/// or query it belongs to.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The file is missing or could not be read.
    #[error("cannot read inventory file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row, quantity or date does not have the expected shape.
    #[error("{location}: {message} ({value:?})")]
    Format {
        location: String,
        message: String,
        value: String,
    },
}

impl InventoryError {
    pub(crate) fn format(
        location: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        InventoryError::Format {
            location: location.into(),
            message: message.into(),
            value: value.into(),
        }
    }

    /// Whether this is a read failure, which a caller may retry with another path.
    pub fn is_io(&self) -> bool {
        matches!(self, InventoryError::Io { .. })
    }
}
