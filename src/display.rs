//! Plain-text rendering of settings and configurations

use std::fmt::Write;

use crate::model::configuration::Configuration;
use crate::model::setting::{Category, Setting, SettingValue};

/// One line per setting: name, category, value and (for non-bool) the range
///
/// ```
/// use syscfg::{display::render_setting, Category, Setting};
///
/// let s = Setting::new("BOOT_TIMEOUT", Category::Boot, 5u8, 0, 30).unwrap();
/// assert_eq!(render_setting(&s), "BOOT_TIMEOUT         [Boot] 5 (Range: 0-30)");
/// ```
#[must_use]
pub fn render_setting(setting: &Setting) -> String {
    let mut out = format!(
        "{:<20} [{}] {}",
        setting.name(),
        setting.category(),
        setting.value()
    );
    if !matches!(setting.value(), SettingValue::Bool(_)) {
        write!(out, " (Range: {}-{})", setting.min(), setting.max()).unwrap();
    }
    out
}

/// Numbered listing of one category
#[must_use]
pub fn render_category(config: &Configuration, category: Category) -> String {
    let mut out = String::new();
    writeln!(out, "=== {category} Settings ===").unwrap();

    let mut count = 0;
    for setting in config.settings_in(category) {
        count += 1;
        writeln!(out, "{count}. {}", render_setting(setting)).unwrap();
    }
    if count == 0 {
        out.push_str("No settings found for this category.\n");
    }

    out
}

/// Header fields followed by every setting
#[must_use]
pub fn render_summary(config: &Configuration) -> String {
    let header = config.header();
    let mut out = String::new();

    out.push_str("=== System Configuration ===\n");
    writeln!(out, "Version: {}", header.version).unwrap();
    writeln!(out, "Settings: {}", header.setting_count).unwrap();
    writeln!(out, "Checksum: {:04X}", header.checksum).unwrap();
    out.push('\n');

    for setting in config {
        writeln!(out, "{}", render_setting(setting)).unwrap();
    }

    out
}
