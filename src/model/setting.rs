//! Typed setting values and their metadata

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Maximum setting name length in bytes (the on-disk field adds a terminator)
pub const MAX_NAME_LEN: usize = 31;

/// Width of the on-disk name field
pub const NAME_FIELD_LEN: usize = 32;

/// Capacity of the value buffer in a setting record
pub const MAX_VALUE_LEN: usize = 16;

/// Setting name storage, wide enough for a name field read without terminator
pub type SettingName = heapless::String<NAME_FIELD_LEN>;

/// String value storage
pub type StringValue = heapless::String<MAX_VALUE_LEN>;

// =============================================================================
// Category
// =============================================================================

/// Grouping tag used for display and per-category validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Memory,
    Boot,
    Io,
    Power,
    /// Tag outside 1-5, kept as read
    Unknown(u8),
}

impl Category {
    /// All categories in tag order
    pub const ALL: [Category; 5] = [
        Category::Cpu,
        Category::Memory,
        Category::Boot,
        Category::Io,
        Category::Power,
    ];

    /// On-disk tag (1-5)
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Category::Cpu => 1,
            Category::Memory => 2,
            Category::Boot => 3,
            Category::Io => 4,
            Category::Power => 5,
            Category::Unknown(tag) => tag,
        }
    }

    /// Human readable name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Memory => "Memory",
            Category::Boot => "Boot",
            Category::Io => "I/O",
            Category::Power => "Power",
            Category::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for Category {
    fn from(tag: u8) -> Self {
        match tag {
            1 => Category::Cpu,
            2 => Category::Memory,
            3 => Category::Boot,
            4 => Category::Io,
            5 => Category::Power,
            other => Category::Unknown(other),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Setting Type
// =============================================================================

/// Primitive type of a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    UInt8,
    UInt16,
    UInt32,
    String,
    Bool,
    /// Tag outside 1-5, kept as read
    Unknown(u8),
}

impl SettingType {
    /// On-disk tag (1-5)
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            SettingType::UInt8 => 1,
            SettingType::UInt16 => 2,
            SettingType::UInt32 => 3,
            SettingType::String => 4,
            SettingType::Bool => 5,
            SettingType::Unknown(tag) => tag,
        }
    }

    /// Canonical encoded width, `None` for variable-width strings and unknown tags
    #[must_use]
    pub fn width(self) -> Option<usize> {
        match self {
            SettingType::UInt8 | SettingType::Bool => Some(1),
            SettingType::UInt16 => Some(2),
            SettingType::UInt32 => Some(4),
            SettingType::String | SettingType::Unknown(_) => None,
        }
    }

    /// Human readable name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SettingType::UInt8 => "uint8",
            SettingType::UInt16 => "uint16",
            SettingType::UInt32 => "uint32",
            SettingType::String => "string",
            SettingType::Bool => "bool",
            SettingType::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for SettingType {
    fn from(tag: u8) -> Self {
        match tag {
            1 => SettingType::UInt8,
            2 => SettingType::UInt16,
            3 => SettingType::UInt32,
            4 => SettingType::String,
            5 => SettingType::Bool,
            other => SettingType::Unknown(other),
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Raw Value
// =============================================================================

/// Value fields of a record exactly as stored
///
/// Records whose value does not fit their type tag are kept in this form so
/// they can be reported by the validator and written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawValue {
    pub type_tag: u8,
    pub size: u8,
    pub data: [u8; MAX_VALUE_LEN],
}

impl RawValue {
    #[must_use]
    pub fn setting_type(&self) -> SettingType {
        SettingType::from(self.type_tag)
    }

    /// First reason the stored bytes do not form a value of their type
    #[must_use]
    pub fn defect(&self) -> Option<ValueDefect> {
        let setting_type = self.setting_type();
        let size = usize::from(self.size);

        let size_ok = match setting_type {
            SettingType::Unknown(tag) => return Some(ValueDefect::UnknownType(tag)),
            SettingType::String => size <= MAX_VALUE_LEN,
            other => other.width() == Some(size),
        };
        if !size_ok {
            return Some(ValueDefect::SizeMismatch {
                size: self.size,
                setting_type,
            });
        }

        match setting_type {
            SettingType::Bool if self.data[0] > 1 => {
                Some(ValueDefect::NonBinaryBool(self.data[0]))
            }
            SettingType::String if std::str::from_utf8(&self.data[..size]).is_err() => {
                Some(ValueDefect::InvalidString)
            }
            _ => None,
        }
    }
}

/// Why a stored value could not be read as its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDefect {
    UnknownType(u8),
    SizeMismatch { size: u8, setting_type: SettingType },
    NonBinaryBool(u8),
    InvalidString,
}

impl fmt::Display for ValueDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDefect::UnknownType(_) => f.write_str("Invalid data type"),
            ValueDefect::SizeMismatch { size, setting_type } => {
                write!(f, "Value size {size} does not match type {setting_type}")
            }
            ValueDefect::NonBinaryBool(_) => f.write_str("Boolean value must be 0 or 1"),
            ValueDefect::InvalidString => f.write_str("String value is not valid UTF-8"),
        }
    }
}

// =============================================================================
// Setting Value
// =============================================================================

/// A setting value, tagged by its primitive type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SettingValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    String(StringValue),
    Bool(bool),
    /// Stored bytes that do not form a value of their type
    Invalid(RawValue),
}

impl SettingValue {
    /// Build a string value, rejecting anything longer than the value buffer
    pub fn string(value: &str) -> Result<Self> {
        let mut s = StringValue::new();
        s.push_str(value).map_err(|()| Error::InvalidSettingValue {
            key: value.to_string(),
            reason: format!("string values are limited to {MAX_VALUE_LEN} bytes"),
        })?;
        Ok(SettingValue::String(s))
    }

    /// Interpret stored value fields, keeping them raw if they are defective
    #[must_use]
    pub fn from_raw(raw: RawValue) -> Self {
        if raw.defect().is_some() {
            return SettingValue::Invalid(raw);
        }

        let data = &raw.data;
        match raw.setting_type() {
            SettingType::UInt8 => SettingValue::UInt8(data[0]),
            SettingType::UInt16 => SettingValue::UInt16(u16::from_le_bytes([data[0], data[1]])),
            SettingType::UInt32 => {
                SettingValue::UInt32(u32::from_le_bytes([data[0], data[1], data[2], data[3]]))
            }
            SettingType::Bool => SettingValue::Bool(data[0] == 1),
            SettingType::String => {
                let size = usize::from(raw.size);
                std::str::from_utf8(&data[..size])
                    .ok()
                    .and_then(|text| SettingValue::string(text).ok())
                    .unwrap_or(SettingValue::Invalid(raw))
            }
            SettingType::Unknown(_) => SettingValue::Invalid(raw),
        }
    }

    /// Type tag of this value
    #[must_use]
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::UInt8(_) => SettingType::UInt8,
            SettingValue::UInt16(_) => SettingType::UInt16,
            SettingValue::UInt32(_) => SettingType::UInt32,
            SettingValue::String(_) => SettingType::String,
            SettingValue::Bool(_) => SettingType::Bool,
            SettingValue::Invalid(raw) => raw.setting_type(),
        }
    }

    /// Number of meaningful bytes when encoded
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            SettingValue::String(s) => s.len(),
            SettingValue::Invalid(raw) => usize::from(raw.size),
            other => other.setting_type().width().unwrap_or(0),
        }
    }

    /// Why the stored bytes are unusable, `None` for every typed value
    #[must_use]
    pub fn defect(&self) -> Option<ValueDefect> {
        match self {
            SettingValue::Invalid(raw) => raw.defect(),
            _ => None,
        }
    }

    /// Numeric view used for range checks (booleans are 0 or 1)
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            SettingValue::UInt8(v) => Some(u32::from(*v)),
            SettingValue::UInt16(v) => Some(u32::from(*v)),
            SettingValue::UInt32(v) => Some(*v),
            SettingValue::Bool(v) => Some(u32::from(*v)),
            SettingValue::String(_) | SettingValue::Invalid(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<u8> for SettingValue {
    fn from(v: u8) -> Self {
        SettingValue::UInt8(v)
    }
}

impl From<u16> for SettingValue {
    fn from(v: u16) -> Self {
        SettingValue::UInt16(v)
    }
}

impl From<u32> for SettingValue {
    fn from(v: u32) -> Self {
        SettingValue::UInt32(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::UInt8(v) => write!(f, "{v}"),
            SettingValue::UInt16(v) => write!(f, "{v}"),
            SettingValue::UInt32(v) => write!(f, "{v}"),
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Bool(true) => f.write_str("Enabled"),
            SettingValue::Bool(false) => f.write_str("Disabled"),
            SettingValue::Invalid(_) => f.write_str("Invalid"),
        }
    }
}

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Reserved per-setting flags, stored and passed through unchanged
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SettingFlags: u8 {
        /// Setting should not be modified by interactive front-ends
        const READ_ONLY = 0b0000_0001;
        /// Setting is hidden from listings
        const HIDDEN = 0b0000_0010;
    }
}

impl Default for SettingFlags {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Setting
// =============================================================================

/// One named, typed, range-bounded configuration value
///
/// # Example
///
/// ```
/// use syscfg::{Category, Setting};
///
/// let freq = Setting::new("CPU_FREQ", Category::Cpu, 3200u32, 800, 5000).unwrap();
/// assert_eq!(freq.size(), 4);
/// assert_eq!(freq.value().as_u32(), Some(3200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    name: SettingName,
    category: Category,
    value: SettingValue,
    min: u32,
    max: u32,
    #[serde(default)]
    flags: SettingFlags,
}

impl Setting {
    /// Create a setting with inclusive bounds `[min, max]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettingValue`] if the name does not fit in 31 bytes.
    pub fn new(
        name: &str,
        category: Category,
        value: impl Into<SettingValue>,
        min: u32,
        max: u32,
    ) -> Result<Self> {
        let too_long = || Error::InvalidSettingValue {
            key: name.to_string(),
            reason: format!("setting names are limited to {MAX_NAME_LEN} bytes"),
        };
        if name.len() > MAX_NAME_LEN {
            return Err(too_long());
        }
        let mut stored = SettingName::new();
        stored.push_str(name).map_err(|()| too_long())?;

        Ok(Self {
            name: stored,
            category,
            value: value.into(),
            min,
            max,
            flags: SettingFlags::empty(),
        })
    }

    /// Assemble a setting from decoded record fields without checks
    pub(crate) fn from_record(
        name: SettingName,
        category: Category,
        value: SettingValue,
        min: u32,
        max: u32,
        flags: SettingFlags,
    ) -> Self {
        Self {
            name,
            category,
            value,
            min,
            max,
            flags,
        }
    }

    /// Create a boolean setting (bounds are always `[0, 1]`)
    pub fn toggle(name: &str, category: Category, enabled: bool) -> Result<Self> {
        Self::new(name, category, enabled, 0, 1)
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SettingFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn setting_type(&self) -> SettingType {
        self.value.setting_type()
    }

    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    /// Length of the meaningful prefix of the encoded value
    pub fn size(&self) -> usize {
        self.value.size()
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn flags(&self) -> SettingFlags {
        self.flags
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(SettingFlags::READ_ONLY)
    }

    /// Replace the value; the caller guarantees the type matches
    pub(crate) fn replace_value(&mut self, value: SettingValue) {
        self.value = value;
    }
}
