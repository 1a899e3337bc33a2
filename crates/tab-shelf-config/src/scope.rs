/// Storage scope selector shared by the configuration and storage layers.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which key-value area a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    /// Stored on this device only.
    #[default]
    Local,
    /// Synchronized across the user's devices.
    Sync,
}

impl StorageScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Sync => "sync",
        }
    }
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
