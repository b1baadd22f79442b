//! Configuration container and name-based accessors

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{Error, Result};
use crate::model::setting::{Category, Setting, SettingValue};

/// Maximum number of settings in one configuration
pub const MAX_SETTINGS: usize = 64;

/// Bounded setting storage
pub type SettingList = heapless::Vec<Setting, MAX_SETTINGS>;

/// File header as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigHeader {
    pub signature: [u8; 4],
    pub version: u16,
    pub setting_count: u16,
    pub data_size: u32,
    pub checksum: u16,
    pub reserved: u16,
}

impl Default for ConfigHeader {
    fn default() -> Self {
        Self {
            signature: codec::SIGNATURE,
            version: codec::FORMAT_VERSION,
            setting_count: 0,
            data_size: 0,
            checksum: 0,
            reserved: 0,
        }
    }
}

/// Header plus the ordered settings it describes
///
/// Settings keep insertion order; lookups scan linearly and the first match
/// wins when names repeat.
///
/// # Example
///
/// ```
/// use syscfg::{default_configuration, SettingValue};
///
/// let mut config = default_configuration();
/// config.set_by_name("BOOT_TIMEOUT", SettingValue::UInt8(10))?;
/// assert_eq!(config.get_by_name("BOOT_TIMEOUT")?.value().as_u32(), Some(10));
/// # Ok::<(), syscfg::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Configuration {
    header: ConfigHeader,
    settings: SettingList,
}

impl Configuration {
    /// Create an empty configuration with a fresh header
    #[must_use]
    pub fn new() -> Self {
        let mut config = Self::default();
        config.sync_header();
        config
    }

    /// Assemble a configuration read from disk, keeping the header as stored
    pub(crate) fn from_parts(header: ConfigHeader, settings: SettingList) -> Self {
        Self { header, settings }
    }

    pub fn header(&self) -> &ConfigHeader {
        &self.header
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Setting> {
        self.settings.iter()
    }

    /// Settings of one category, in sequence order
    pub fn settings_in(&self, category: Category) -> impl Iterator<Item = &Setting> {
        self.settings
            .iter()
            .filter(move |s| s.category() == category)
    }

    /// Append a setting
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManySettings`] when the configuration already holds
    /// 64 settings; nothing is changed in that case.
    pub fn push(&mut self, setting: Setting) -> Result<()> {
        self.settings.push(setting).map_err(|_| Error::TooManySettings {
            count: MAX_SETTINGS + 1,
            max: MAX_SETTINGS,
        })?;
        self.sync_header();
        Ok(())
    }

    /// Look up a setting by exact name
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingNotFound`] if no setting has this name.
    pub fn get_by_name(&self, name: &str) -> Result<&Setting> {
        self.settings
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| Error::SettingNotFound(name.to_string()))
    }

    /// Overwrite the value of the first setting called `name`
    ///
    /// Bounds are not checked here; run the validator afterwards. The header
    /// checksum is recomputed on success.
    ///
    /// The whole value is replaced. For strings the stored size becomes the
    /// length of the new string, so a shorter or longer string than the
    /// current one changes `size` and no bytes of the old value survive.
    /// Writing a typed value over a setting loaded as
    /// [`SettingValue::Invalid`] repairs it.
    ///
    /// # Errors
    ///
    /// * [`Error::SettingNotFound`] if no setting has this name
    /// * [`Error::TypeMismatch`] if `value` is not of the setting's type
    /// * [`Error::InvalidSettingValue`] if `value` is itself
    ///   [`SettingValue::Invalid`]
    ///
    /// The configuration is left untouched on error.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<()> {
        let value = value.into();
        let setting = self
            .settings
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| Error::SettingNotFound(name.to_string()))?;

        if setting.setting_type() != value.setting_type() {
            return Err(Error::TypeMismatch {
                key: name.to_string(),
                expected: setting.setting_type().to_string(),
                actual: value.setting_type().to_string(),
            });
        }

        if matches!(value, SettingValue::Invalid(_)) {
            return Err(Error::InvalidSettingValue {
                key: name.to_string(),
                reason: "raw record bytes cannot be written as a value".to_string(),
            });
        }

        setting.replace_value(value);
        self.header.checksum = codec::checksum(&self.settings);
        debug!("Setting {name} updated, checksum {:04X}", self.header.checksum);
        Ok(())
    }

    /// Recompute count, size and checksum, and re-stamp signature and version
    pub(crate) fn sync_header(&mut self) {
        self.header = self.stamped_header();
    }

    /// Recompute count and size from the settings, keeping the stored
    /// signature, version and checksum
    ///
    /// Returns true if the stored layout fields disagreed with the settings.
    pub(crate) fn restamp_layout(&mut self) -> bool {
        let stamped = self.stamped_header();
        let stale = self.header.setting_count != stamped.setting_count
            || self.header.data_size != stamped.data_size;
        self.header.setting_count = stamped.setting_count;
        self.header.data_size = stamped.data_size;
        stale
    }

    /// Header as it will be written: always self-consistent with the settings
    pub(crate) fn stamped_header(&self) -> ConfigHeader {
        ConfigHeader {
            signature: codec::SIGNATURE,
            version: codec::FORMAT_VERSION,
            // bounded by MAX_SETTINGS
            setting_count: self.settings.len() as u16,
            data_size: (self.settings.len() * codec::RECORD_SIZE) as u32,
            checksum: codec::checksum(&self.settings),
            reserved: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = &'a Setting;
    type IntoIter = std::slice::Iter<'a, Setting>;

    fn into_iter(self) -> Self::IntoIter {
        self.settings.iter()
    }
}
