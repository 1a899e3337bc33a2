/// Error types for the tab shelf.
use tab_shelf_config::StorageScope;
use thiserror::Error;

/// Failure reported by a storage area or while converting a stored value.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The underlying store rejected the call. The message is passed
    /// through as reported.
    #[error("{scope} storage failed: {message}")]
    Backend { scope: StorageScope, message: String },

    /// A value could not be converted into its stored JSON form.
    #[error("failed to encode value for key `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value does not match the expected shape.
    #[error("failed to decode value for key `{key}`")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn backend(scope: StorageScope, message: impl ToString) -> Self {
        Self::Backend {
            scope,
            message: message.to_string(),
        }
    }
}

/// Errors surfaced by session-level operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The browser tab collaborator failed.
    #[error("tab inventory error: {0}")]
    Inventory(String),

    #[error("no active tab in the current window")]
    NoActiveTab,

    #[error("tab group index {index} out of range (len {len})")]
    GroupOutOfRange { index: usize, len: usize },

    #[error("tab index {index} out of range (len {len})")]
    TabOutOfRange { index: usize, len: usize },
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
