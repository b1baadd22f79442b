//! Error types for syscfg

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for syscfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for syscfg
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Invalid signature: expected \"SYSC\", found {found:02X?}")]
    InvalidSignature { found: [u8; 4] },

    #[error("Truncated {section}: need {needed} bytes, got {available}")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Too many settings ({count} > {max})")]
    TooManySettings { count: usize, max: usize },

    // -------------------------------------------------------------------------
    // Integrity
    // -------------------------------------------------------------------------
    #[error("Checksum mismatch (calculated: {computed:04X}, expected: {stored:04X})")]
    ChecksumMismatch { stored: u16, computed: u16 },

    // -------------------------------------------------------------------------
    // Settings Errors
    // -------------------------------------------------------------------------
    #[error("Setting not found: {0}")]
    SettingNotFound(String),

    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid setting value for {key}: {reason}")]
    InvalidSettingValue { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[cfg(feature = "json")]
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if the underlying byte stream could not be opened, read or written
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. } | Error::FileWrite { .. } | Error::DirectoryCreate { .. }
        )
    }

    /// Check if the bytes were not a structurally valid configuration
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSignature { .. }
                | Error::Truncated { .. }
                | Error::TooManySettings { .. }
        )
    }

    /// Check if this is a lookup, type or bounds failure on a setting
    #[must_use]
    pub fn is_invalid_setting(&self) -> bool {
        matches!(
            self,
            Error::SettingNotFound(_) | Error::TypeMismatch { .. } | Error::InvalidSettingValue { .. }
        )
    }

    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::SettingNotFound(_) => true,
            Error::FileRead { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

// =============================================================================
// Filesystem Helper Functions
// =============================================================================
// These reduce repetitive map_err patterns in the storage layer.

use std::path::Path;

/// Create a directory (and parents) with proper error handling
pub fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a whole file with proper error handling
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write content to a file with proper error handling
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
