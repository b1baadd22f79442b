//! Settings data model

pub mod configuration;
pub mod setting;

pub use configuration::{ConfigHeader, Configuration, MAX_SETTINGS, SettingList};
pub use setting::{
    Category, MAX_NAME_LEN, MAX_VALUE_LEN, NAME_FIELD_LEN, RawValue, Setting, SettingFlags,
    SettingName, SettingType, SettingValue, StringValue, ValueDefect,
};
