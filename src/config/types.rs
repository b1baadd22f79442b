//! Core types for locating a configuration store

use std::path::{Path, PathBuf};

use crate::storage::{BinaryStorage, StorageBackend};

#[cfg(feature = "json")]
use crate::storage::JsonStorage;

/// Directory name under the system config dir
pub const DEFAULT_APP_DIR: &str = "syscfg";

/// File name used when none is configured
pub const DEFAULT_FILE_NAME: &str = "default.bin";

/// Subdirectory of the config dir that generated presets are written to
pub const PRESET_DIR: &str = "presets";

/// Configuration for initializing the ConfigManager
#[derive(Debug, Clone)]
pub struct StoreConfig<S: StorageBackend = BinaryStorage> {
    /// Directory where configuration files are stored
    pub config_dir: PathBuf,

    /// Filename for the main configuration file (e.g., "default.bin")
    pub file_name: String,

    /// Write the default configuration when the file does not exist yet
    pub create_if_missing: bool,

    /// Storage backend implementation
    pub storage: S,
}

impl Default for StoreConfig<BinaryStorage> {
    fn default() -> Self {
        StoreConfigBuilder::new().build()
    }
}

impl<S: StorageBackend> StoreConfig<S> {
    /// Get the full path to the main configuration file
    pub fn file_path(&self) -> PathBuf {
        self.config_dir.join(&self.file_name)
    }

    /// Path of a sibling file in the same directory
    pub fn sibling_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.config_dir.join(file_name)
    }

    /// Path of a generated preset file, kept apart from the main file
    pub fn preset_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.config_dir.join(PRESET_DIR).join(file_name)
    }
}

impl StoreConfig<BinaryStorage> {
    /// Create a new builder for StoreConfig
    ///
    /// # Example
    /// ```rust
    /// use syscfg::StoreConfig;
    ///
    /// let config = StoreConfig::builder()
    ///     .config_dir("/tmp/syscfg")
    ///     .build();
    /// assert!(config.file_path().ends_with("default.bin"));
    /// ```
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }
}

/// Builder for creating StoreConfig with a fluent API
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder<S: StorageBackend = BinaryStorage> {
    config_dir: Option<PathBuf>,
    file_name: Option<String>,
    create_if_missing: bool,
    storage: S,
}

impl StoreConfigBuilder<BinaryStorage> {
    pub fn new() -> Self {
        Self {
            config_dir: None,
            file_name: None,
            create_if_missing: true,
            storage: BinaryStorage,
        }
    }
}

impl Default for StoreConfigBuilder<BinaryStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StorageBackend> StoreConfigBuilder<S> {
    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        // Expand ~ to home directory
        let expanded = if path.starts_with("~") {
            if let Some(home) = dirs::home_dir() {
                home.join(path.strip_prefix("~").unwrap_or(&path))
            } else {
                path
            }
        } else {
            path
        };
        self.config_dir = Some(expanded);
        self
    }

    /// Set the file name (default: "default.bin", or "default.json" with JSON storage)
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Whether loading a missing file writes the defaults (default: true)
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Use a custom storage backend
    pub fn storage<T: StorageBackend>(self, storage: T) -> StoreConfigBuilder<T> {
        StoreConfigBuilder {
            config_dir: self.config_dir,
            file_name: self.file_name,
            create_if_missing: self.create_if_missing,
            storage,
        }
    }

    /// Store the configuration as pretty-printed JSON instead of SYSC binary
    #[cfg(feature = "json")]
    pub fn json_storage(self) -> StoreConfigBuilder<JsonStorage> {
        self.storage(JsonStorage::new())
    }

    /// Build the StoreConfig
    ///
    /// If `config_dir` is not set, uses the system config directory, falling
    /// back to `./configs`.
    pub fn build(self) -> StoreConfig<S> {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_APP_DIR))
                .unwrap_or_else(|| PathBuf::from("configs"))
        });

        let file_name = self.file_name.unwrap_or_else(|| {
            if self.storage.extension() == "bin" {
                DEFAULT_FILE_NAME.to_string()
            } else {
                format!("default.{}", self.storage.extension())
            }
        });

        StoreConfig {
            config_dir,
            file_name,
            create_if_missing: self.create_if_missing,
            storage: self.storage,
        }
    }
}
