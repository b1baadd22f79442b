//! Storage backend trait and implementations

use log::debug;
use std::path::Path;

use crate::codec::{self, ChecksumMismatch, ParseOutcome};
use crate::error::{self, Error, Result};
use crate::model::configuration::Configuration;

/// Trait for storage backend implementations
///
/// `BinaryStorage` speaks the SYSC format; `JsonStorage` is a human-readable
/// export of the same model.
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "bin", "json")
    fn extension(&self) -> &str;

    /// Encode a configuration to bytes
    fn encode(&self, config: &Configuration) -> Result<Vec<u8>>;

    /// Decode bytes into a configuration plus its integrity status
    fn decode(&self, bytes: &[u8]) -> Result<ParseOutcome>;

    /// Read and decode from file
    fn read(&self, path: &Path) -> Result<ParseOutcome> {
        let bytes = error::read_file(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.decode(&bytes)
    }

    /// Encode and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write(&self, path: &Path, config: &Configuration) -> Result<()> {
        let content = self.encode(config)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                error::create_dir(parent)?;
            }
        }

        // Atomic write: temp file + rename
        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        error::write_file(&temp_path, &content)?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

// =============================================================================
// Binary Storage Implementation
// =============================================================================

/// SYSC binary storage backend (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryStorage;

impl BinaryStorage {
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for BinaryStorage {
    fn extension(&self) -> &str {
        "bin"
    }

    fn encode(&self, config: &Configuration) -> Result<Vec<u8>> {
        Ok(codec::serialize(config))
    }

    fn decode(&self, bytes: &[u8]) -> Result<ParseOutcome> {
        codec::parse(bytes)
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend
///
/// The header is stored alongside the settings. On decode the signature must
/// be `"SYSC"`, the setting count and data size are recomputed from the
/// settings, and the stored checksum is compared against one recomputed from
/// the settings.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Default)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

#[cfg(feature = "json")]
impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

#[cfg(feature = "json")]
impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn encode(&self, config: &Configuration) -> Result<Vec<u8>> {
        if self.pretty {
            serde_json::to_vec_pretty(config).map_err(Error::from)
        } else {
            serde_json::to_vec(config).map_err(Error::from)
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ParseOutcome> {
        let mut config: Configuration = serde_json::from_slice(bytes)?;

        let signature = config.header().signature;
        if signature != codec::SIGNATURE {
            return Err(Error::InvalidSignature { found: signature });
        }

        if config.restamp_layout() {
            log::warn!(
                "JSON header disagrees with its {} settings, count and size recomputed",
                config.len()
            );
        }

        let stored = config.header().checksum;
        let computed = codec::checksum(config.settings());
        let checksum_mismatch = (stored != computed).then(|| {
            log::warn!(
                "Checksum mismatch in JSON configuration (calculated: {computed:04X}, expected: {stored:04X})"
            );
            ChecksumMismatch { stored, computed }
        });

        Ok(ParseOutcome {
            config,
            checksum_mismatch,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_configuration;
    use tempfile::tempdir;

    #[test]
    fn test_binary_roundtrip() {
        let storage = BinaryStorage::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/default.bin");

        let mut config = default_configuration();
        config.set_by_name("SATA_MODE", 2u8).unwrap();

        storage.write(&path, &config).unwrap();
        let loaded = storage.read(&path).unwrap();

        assert!(loaded.is_intact());
        assert_eq!(loaded.config, config);
        assert!(!dir.path().join("nested/default.bin.tmp").exists());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_serialize_pretty() {
        let json = JsonStorage::new().encode(&default_configuration()).unwrap();
        let text = String::from_utf8(json).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains("\"CPU_FREQ\""));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_serialize_compact() {
        let json = JsonStorage::compact().encode(&default_configuration()).unwrap();
        assert!(!json.contains(&b'\n'));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = BinaryStorage::new().read(Path::new("/nonexistent/default.bin"));

        let err = result.unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_write_rejects_path_without_file_name() {
        let err = BinaryStorage::new()
            .write(Path::new("/"), &default_configuration())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
