//! Configuration manager
//!
//! This module contains the [`ConfigManager`] struct which is the primary entry point
//! for working with a configuration file on disk.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::codec::ChecksumMismatch;
use crate::config::StoreConfig;
use crate::defaults::default_configuration;
use crate::display::render_summary;
use crate::error::Result;
use crate::model::configuration::Configuration;
use crate::model::setting::{Setting, SettingValue};
use crate::presets::Preset;
use crate::storage::{BinaryStorage, StorageBackend};
use crate::validator::{Validation, validate_all, validate_setting_value};

/// How the in-memory configuration came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Read from disk and the checksum matched
    Loaded,
    /// Read from disk but the stored checksum was wrong; values are kept
    ChecksumMismatch(ChecksumMismatch),
    /// No file existed; defaults were written to disk
    CreatedDefaults,
    /// No file existed; defaults are in memory only
    Defaults,
}

impl LoadStatus {
    /// True if the configuration came from an existing file
    pub fn from_disk(&self) -> bool {
        matches!(self, LoadStatus::Loaded | LoadStatus::ChecksumMismatch(_))
    }
}

/// Loads, edits, validates and saves one configuration file.
///
/// The manager owns the working [`Configuration`]; nothing touches the disk
/// until [`load`](Self::load), [`save`](Self::save) or one of the
/// convenience methods built on them is called.
///
/// # Example
///
/// ```rust,no_run
/// use syscfg::{ConfigManager, StoreConfig};
///
/// let store = StoreConfig::builder().config_dir("/tmp/syscfg").build();
/// let mut manager = ConfigManager::new(store);
///
/// // Load settings (creates file with defaults if missing)
/// manager.load_or_default()?;
///
/// manager.set("BOOT_TIMEOUT", 10u8)?;
/// assert!(manager.validate().passed());
/// manager.save()?;
/// # Ok::<(), syscfg::Error>(())
/// ```
#[derive(Debug)]
pub struct ConfigManager<S: StorageBackend = BinaryStorage> {
    store: StoreConfig<S>,
    config: Configuration,
}

impl<S: StorageBackend> ConfigManager<S> {
    /// Create a manager holding the default configuration
    pub fn new(store: StoreConfig<S>) -> Self {
        info!(
            "Config manager initialized at {}",
            store.file_path().display()
        );
        Self {
            store,
            config: default_configuration(),
        }
    }

    /// Path of the managed file
    pub fn path(&self) -> PathBuf {
        self.store.file_path()
    }

    pub fn store(&self) -> &StoreConfig<S> {
        &self.store
    }

    /// The working configuration
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Hand the working configuration to the caller
    pub fn into_configuration(self) -> Configuration {
        self.config
    }

    // =========================================================================
    // Disk I/O
    // =========================================================================

    /// Replace the working configuration with the file's contents
    ///
    /// A checksum mismatch is not an error: the parsed values are kept and the
    /// mismatch is reported through the returned status.
    ///
    /// # Errors
    ///
    /// File errors and format errors; the working configuration is unchanged.
    pub fn load(&mut self) -> Result<LoadStatus> {
        let path = self.path();
        let outcome = self.store.storage.read(&path)?;

        let status = match outcome.checksum_mismatch {
            Some(mismatch) => {
                warn!(
                    "Loaded {} with a bad checksum, values may be corrupted",
                    path.display()
                );
                LoadStatus::ChecksumMismatch(mismatch)
            }
            None => LoadStatus::Loaded,
        };

        self.config = outcome.config;
        info!(
            "Configuration loaded from {} ({} settings)",
            path.display(),
            self.config.len()
        );
        Ok(status)
    }

    /// Load the file, or fall back to the defaults if it does not exist
    ///
    /// With `create_if_missing` the defaults are also written to disk.
    ///
    /// # Errors
    ///
    /// Anything other than a missing file is propagated, so a damaged file is
    /// never silently replaced.
    pub fn load_or_default(&mut self) -> Result<LoadStatus> {
        match self.load() {
            Ok(status) => Ok(status),
            Err(e) if e.is_not_found() => {
                info!(
                    "No configuration at {}, using defaults",
                    self.path().display()
                );
                self.config = default_configuration();
                if self.store.create_if_missing {
                    self.save()?;
                    Ok(LoadStatus::CreatedDefaults)
                } else {
                    Ok(LoadStatus::Defaults)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Write the working configuration to the managed file
    pub fn save(&self) -> Result<()> {
        let path = self.path();
        self.store.storage.write(&path, &self.config)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Write the working configuration under another name in the same directory
    pub fn save_as(&self, file_name: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.store.sibling_path(file_name);
        self.store.storage.write(&path, &self.config)?;
        info!("Configuration saved to {}", path.display());
        Ok(path)
    }

    /// Reset the working configuration to defaults and save it
    pub fn reset(&mut self) -> Result<()> {
        self.config = default_configuration();
        self.save()?;
        info!("All settings reset to defaults");
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Look up a setting in the working configuration
    pub fn get(&self, name: &str) -> Result<&Setting> {
        self.config.get_by_name(name)
    }

    /// Set a value without range checks; validate afterwards
    pub fn set(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<()> {
        self.config.set_by_name(name, value)
    }

    /// Set a value only if it has the right type and is within bounds
    ///
    /// # Errors
    ///
    /// `SettingNotFound`, `TypeMismatch` or `InvalidSettingValue`; the
    /// configuration is unchanged on error.
    pub fn set_checked(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<()> {
        let value = value.into();
        validate_setting_value(self.config.get_by_name(name)?, &value)?;
        self.config.set_by_name(name, value)
    }

    /// Run every validator over the working configuration
    pub fn validate(&self) -> Validation {
        validate_all(&self.config)
    }

    /// Text summary of the working configuration
    pub fn summary(&self) -> String {
        render_summary(&self.config)
    }

    // =========================================================================
    // Presets
    // =========================================================================

    /// Replace the working configuration with a preset (not saved)
    pub fn apply_preset(&mut self, preset: Preset) -> Result<()> {
        self.config = preset.build()?;
        debug!("Applied {preset:?} preset");
        Ok(())
    }

    /// Write every preset into the `presets` subdirectory
    ///
    /// File names follow [`Preset::file_name`] with the backend's extension.
    /// The managed file is never written here: a preset whose path would be
    /// the managed file is skipped with a warning.
    pub fn generate_presets(&self) -> Result<Vec<PathBuf>> {
        let managed = self.path();
        let mut written = Vec::with_capacity(Preset::ALL.len());

        for preset in Preset::ALL {
            let file_name =
                Path::new(preset.file_name()).with_extension(self.store.storage.extension());
            let path = self.store.preset_path(file_name);
            if path == managed {
                warn!("Skipped {preset:?} preset: {} is the managed file", path.display());
                continue;
            }
            self.store.storage.write(&path, &preset.build()?)?;
            debug!("Wrote {preset:?} preset to {}", path.display());
            written.push(path);
        }

        info!("Generated {} presets", written.len());
        Ok(written)
    }
}

impl ConfigManager<BinaryStorage> {
    /// Manager for the default store location
    pub fn with_defaults() -> Self {
        Self::new(StoreConfig::default())
    }
}
