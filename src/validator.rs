//! Read-only validation of settings and configurations
//!
//! Validators never mutate and never fail: each returns a [`Validation`]
//! holding every issue found, in check order. Errors make a validation fail,
//! warnings do not. Whether warnings block anything is up to the caller.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::configuration::Configuration;
use crate::model::setting::{Setting, SettingValue};

/// Slowest processor frequency that still boots (MHz)
pub const CPU_FREQ_MIN: u32 = 800;
/// Fastest processor frequency considered safe for the hardware (MHz)
pub const CPU_FREQ_MAX: u32 = 5000;
/// Above this the processor needs extra cooling (MHz)
pub const CPU_FREQ_THERMAL: u32 = 4000;
/// Supported memory frequency range (MHz)
pub const MEMORY_FREQ_MIN: u32 = 1333;
pub const MEMORY_FREQ_MAX: u32 = 4000;
/// Memory slower than this starves a processor above `CPU_FREQ_THERMAL`
pub const MEMORY_FREQ_BALANCED: u32 = 2400;
/// Boot timeouts above this delay startup noticeably (seconds)
pub const BOOT_TIMEOUT_LONG: u32 = 30;

// =============================================================================
// Reports
// =============================================================================

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One finding against a setting (or a pair of settings)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub setting: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        let setting = if self.setting.is_empty() {
            "Unknown"
        } else {
            &self.setting
        };
        write!(f, "{level} [{setting}]: {}", self.message)
    }
}

/// Result of one validator entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    issues: Vec<Issue>,
}

impl Validation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no errors were reported (warnings are allowed)
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// All issues in the order they were found
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Append another validation's issues after this one's
    pub fn merge(&mut self, other: Validation) {
        self.issues.extend(other.issues);
    }

    fn error(&mut self, setting: &str, message: impl Into<String>) {
        self.report(setting, message.into(), Severity::Error);
    }

    fn warning(&mut self, setting: &str, message: impl Into<String>) {
        self.report(setting, message.into(), Severity::Warning);
    }

    fn report(&mut self, setting: &str, message: String, severity: Severity) {
        let issue = Issue {
            setting: setting.to_string(),
            message,
            severity,
        };
        warn!("{issue}");
        self.issues.push(issue);
    }
}

// =============================================================================
// Per-setting checks
// =============================================================================

/// Check one setting on its own: name present, stored value readable as its
/// type, and value within bounds
///
/// Booleans ignore `min`/`max`; strings carry no bounds. A value loaded as
/// [`SettingValue::Invalid`] is reported with the reason it could not be read
/// (an unknown type tag is "Invalid data type", a boolean byte above 1 is
/// "Boolean value must be 0 or 1") and is not range checked.
#[must_use]
pub fn validate_setting(setting: &Setting) -> Validation {
    let mut report = Validation::new();

    if setting.name().is_empty() {
        report.error(setting.name(), "Setting name is empty");
    }

    if let Some(defect) = setting.value().defect() {
        report.error(setting.name(), defect.to_string());
    }

    if let Err(reason) = check_bounds(setting, setting.value()) {
        report.error(setting.name(), reason);
    }

    report
}

/// Check a candidate value against a setting before writing it
///
/// # Errors
///
/// * [`Error::TypeMismatch`] if the value is not of the setting's type
/// * [`Error::InvalidSettingValue`] if the value is outside `[min, max]` or
///   is raw record bytes
pub fn validate_setting_value(setting: &Setting, candidate: &SettingValue) -> Result<()> {
    if matches!(candidate, SettingValue::Invalid(_)) {
        return Err(Error::InvalidSettingValue {
            key: setting.name().to_string(),
            reason: "raw record bytes cannot be written as a value".to_string(),
        });
    }

    if candidate.setting_type() != setting.setting_type() {
        return Err(Error::TypeMismatch {
            key: setting.name().to_string(),
            expected: setting.setting_type().to_string(),
            actual: candidate.setting_type().to_string(),
        });
    }

    check_bounds(setting, candidate).map_err(|reason| Error::InvalidSettingValue {
        key: setting.name().to_string(),
        reason,
    })
}

fn check_bounds(setting: &Setting, value: &SettingValue) -> std::result::Result<(), String> {
    match value {
        SettingValue::Bool(_) | SettingValue::String(_) | SettingValue::Invalid(_) => Ok(()),
        numeric => {
            let v = numeric.as_u32().unwrap_or_default();
            if v < setting.min() || v > setting.max() {
                Err(format!(
                    "Value {v} out of range ({}-{})",
                    setting.min(),
                    setting.max()
                ))
            } else {
                Ok(())
            }
        }
    }
}

// =============================================================================
// Safety checks
// =============================================================================

/// Outcome of a domain safety check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Warning,
    Unsafe,
}

/// Processor frequency: unsafe below 800 or above 5000 MHz, warning above 4000
#[must_use]
pub fn check_safe_cpu_frequency(frequency: u32) -> Safety {
    if !(CPU_FREQ_MIN..=CPU_FREQ_MAX).contains(&frequency) {
        Safety::Unsafe
    } else if frequency > CPU_FREQ_THERMAL {
        Safety::Warning
    } else {
        Safety::Safe
    }
}

/// Memory frequency: unsafe outside 1333-4000 MHz
#[must_use]
pub fn check_safe_memory_frequency(frequency: u32) -> Safety {
    if (MEMORY_FREQ_MIN..=MEMORY_FREQ_MAX).contains(&frequency) {
        Safety::Safe
    } else {
        Safety::Unsafe
    }
}

/// A boot order string must not be empty
#[must_use]
pub fn check_valid_boot_order(boot_order: &str) -> bool {
    !boot_order.is_empty()
}

// =============================================================================
// Category checks
// =============================================================================

/// Numeric value of a named setting, if present
///
/// A present string setting is reported as an error. Unreadable values are
/// skipped here since [`validate_setting`] already reports them.
fn numeric_setting(config: &Configuration, name: &str, report: &mut Validation) -> Option<u32> {
    let setting = config.get_by_name(name).ok()?;
    match setting.value() {
        SettingValue::Invalid(_) => None,
        SettingValue::String(_) => {
            report.error(
                name,
                format!("Expected a numeric value, found {}", setting.setting_type()),
            );
            None
        }
        value => value.as_u32(),
    }
}

/// Processor settings: `CPU_FREQ` safety bounds
#[must_use]
pub fn validate_cpu_settings(config: &Configuration) -> Validation {
    let mut report = Validation::new();

    if let Some(freq) = numeric_setting(config, "CPU_FREQ", &mut report) {
        match check_safe_cpu_frequency(freq) {
            Safety::Unsafe if freq < CPU_FREQ_MIN => report.error(
                "CPU_FREQ",
                format!("Unsafe processor frequency {freq} MHz - system may not boot"),
            ),
            Safety::Unsafe => report.error(
                "CPU_FREQ",
                format!("Unsafe processor frequency {freq} MHz - may damage hardware"),
            ),
            Safety::Warning => report.warning(
                "CPU_FREQ",
                "High processor frequency - ensure adequate cooling",
            ),
            Safety::Safe => {}
        }
    }

    report
}

/// Memory settings: `MEMORY_FREQ` supported range
#[must_use]
pub fn validate_memory_settings(config: &Configuration) -> Validation {
    let mut report = Validation::new();

    if let Some(freq) = numeric_setting(config, "MEMORY_FREQ", &mut report) {
        if check_safe_memory_frequency(freq) == Safety::Unsafe {
            report.error(
                "MEMORY_FREQ",
                format!(
                    "Invalid memory frequency {freq} MHz (supported {MEMORY_FREQ_MIN}-{MEMORY_FREQ_MAX})"
                ),
            );
        }
    }

    report
}

/// Boot settings: long `BOOT_TIMEOUT` is only a warning
#[must_use]
pub fn validate_boot_settings(config: &Configuration) -> Validation {
    let mut report = Validation::new();

    if let Some(timeout) = numeric_setting(config, "BOOT_TIMEOUT", &mut report) {
        if timeout > BOOT_TIMEOUT_LONG {
            report.warning(
                "BOOT_TIMEOUT",
                "Long boot timeout may delay system startup",
            );
        }
    }

    report
}

/// Cross-setting rules; currently the processor/memory balance check
#[must_use]
pub fn detect_setting_conflicts(config: &Configuration) -> Validation {
    check_cpu_memory_compatibility(config)
}

/// Warn when a fast processor is paired with slow memory
#[must_use]
pub fn check_cpu_memory_compatibility(config: &Configuration) -> Validation {
    let mut report = Validation::new();

    let value_of = |name: &str| {
        config
            .get_by_name(name)
            .ok()
            .and_then(|s| s.value().as_u32())
    };

    if let (Some(cpu), Some(mem)) = (value_of("CPU_FREQ"), value_of("MEMORY_FREQ")) {
        if cpu > CPU_FREQ_THERMAL && mem < MEMORY_FREQ_BALANCED {
            report.warning(
                "CPU_FREQ/MEMORY_FREQ",
                "High processor frequency with low memory frequency may reduce performance",
            );
        }
    }

    report
}

/// Run every check: each setting in order, then the category checks, then
/// conflict detection
#[must_use]
pub fn validate_all(config: &Configuration) -> Validation {
    let mut report = Validation::new();

    for setting in config {
        report.merge(validate_setting(setting));
    }
    report.merge(validate_cpu_settings(config));
    report.merge(validate_memory_settings(config));
    report.merge(validate_boot_settings(config));
    report.merge(detect_setting_conflicts(config));

    report
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_configuration;
    use crate::model::setting::{Category, RawValue};

    #[test]
    fn test_defaults_are_clean() {
        let report = validate_all(&default_configuration());
        assert!(report.passed());
        assert!(report.is_clean(), "unexpected issues: {:?}", report.issues());
    }

    #[test]
    fn test_setting_out_of_range() {
        let setting = Setting::new("SATA_MODE", Category::Io, 3u8, 0, 2).unwrap();
        let report = validate_setting(&setting);

        assert!(!report.passed());
        assert_eq!(report.issues().len(), 1);
        assert_eq!(report.issues()[0].message, "Value 3 out of range (0-2)");
    }

    #[test]
    fn test_empty_name_and_range_both_reported() {
        let setting = Setting::new("", Category::Io, 9u16, 0, 2).unwrap();
        let report = validate_setting(&setting);

        let messages: Vec<_> = report.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Setting name is empty", "Value 9 out of range (0-2)"]
        );
        assert_eq!(report.issues()[0].to_string(), "ERROR [Unknown]: Setting name is empty");
    }

    fn raw_setting(name: &str, type_tag: u8, byte: u8) -> Setting {
        let mut data = [0u8; 16];
        data[0] = byte;
        let raw = RawValue {
            type_tag,
            size: 1,
            data,
        };
        Setting::new(name, Category::Io, SettingValue::Invalid(raw), 0, 1).unwrap()
    }

    #[test]
    fn test_invalid_type_reported() {
        let report = validate_setting(&raw_setting("SATA_MODE", 9, 1));

        assert!(!report.passed());
        assert_eq!(report.issues().len(), 1);
        assert_eq!(report.issues()[0].message, "Invalid data type");
    }

    #[test]
    fn test_non_binary_bool_reported() {
        let report = validate_setting(&raw_setting("USB_ENABLE", 5, 2));

        assert_eq!(report.errors().count(), 1);
        assert_eq!(
            report.issues()[0].to_string(),
            "ERROR [USB_ENABLE]: Boolean value must be 0 or 1"
        );
    }

    #[test]
    fn test_empty_name_reported_before_invalid_type() {
        let report = validate_setting(&raw_setting("", 0, 0));

        let messages: Vec<_> = report.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["Setting name is empty", "Invalid data type"]);
    }

    #[test]
    fn test_raw_candidate_rejected() {
        let setting = Setting::toggle("USB_ENABLE", Category::Io, true).unwrap();
        let candidate = raw_setting("USB_ENABLE", 5, 7).value().clone();

        assert!(matches!(
            validate_setting_value(&setting, &candidate),
            Err(Error::InvalidSettingValue { .. })
        ));
    }

    #[test]
    fn test_bool_ignores_bounds() {
        // bounds that would exclude `true` if they applied
        let setting = Setting::new("USB_ENABLE", Category::Io, true, 0, 0).unwrap();
        assert!(validate_setting(&setting).is_clean());
    }

    #[test]
    fn test_validate_setting_value() {
        let setting = Setting::new("BOOT_TIMEOUT", Category::Boot, 5u8, 0, 30).unwrap();

        assert!(validate_setting_value(&setting, &SettingValue::UInt8(30)).is_ok());
        assert!(matches!(
            validate_setting_value(&setting, &SettingValue::UInt8(31)),
            Err(Error::InvalidSettingValue { .. })
        ));
        assert!(matches!(
            validate_setting_value(&setting, &SettingValue::UInt32(10)),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_cpu_frequency_bands() {
        assert_eq!(check_safe_cpu_frequency(799), Safety::Unsafe);
        assert_eq!(check_safe_cpu_frequency(800), Safety::Safe);
        assert_eq!(check_safe_cpu_frequency(4000), Safety::Safe);
        assert_eq!(check_safe_cpu_frequency(4001), Safety::Warning);
        assert_eq!(check_safe_cpu_frequency(5000), Safety::Warning);
        assert_eq!(check_safe_cpu_frequency(5001), Safety::Unsafe);
    }

    #[test]
    fn test_memory_frequency_bands() {
        assert_eq!(check_safe_memory_frequency(1332), Safety::Unsafe);
        assert_eq!(check_safe_memory_frequency(1333), Safety::Safe);
        assert_eq!(check_safe_memory_frequency(4000), Safety::Safe);
        assert_eq!(check_safe_memory_frequency(4001), Safety::Unsafe);
    }

    #[test]
    fn test_boot_order() {
        assert!(check_valid_boot_order("HDD,USB"));
        assert!(!check_valid_boot_order(""));
    }

    #[test]
    fn test_cpu_checks() {
        let mut config = default_configuration();

        config.set_by_name("CPU_FREQ", 4500u32).unwrap();
        let report = validate_cpu_settings(&config);
        assert!(report.passed());
        assert_eq!(report.warnings().count(), 1);

        config.set_by_name("CPU_FREQ", 700u32).unwrap();
        let report = validate_cpu_settings(&config);
        assert!(!report.passed());
        assert!(report.issues()[0].message.contains("may not boot"));

        config.set_by_name("CPU_FREQ", 6000u32).unwrap();
        let report = validate_cpu_settings(&config);
        assert!(report.issues()[0].message.contains("may damage hardware"));
    }

    #[test]
    fn test_memory_checks() {
        let mut config = default_configuration();
        config.set_by_name("MEMORY_FREQ", 1200u32).unwrap();

        let report = validate_memory_settings(&config);
        assert!(!report.passed());
        assert_eq!(report.issues()[0].setting, "MEMORY_FREQ");
    }

    #[test]
    fn test_boot_timeout_only_warns() {
        let mut config = default_configuration();
        config.set_by_name("BOOT_TIMEOUT", 200u8).unwrap();

        let report = validate_boot_settings(&config);
        assert!(report.passed());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_absent_settings_are_not_errors() {
        let config = Configuration::new();
        assert!(validate_cpu_settings(&config).is_clean());
        assert!(validate_memory_settings(&config).is_clean());
        assert!(validate_boot_settings(&config).is_clean());
        assert!(detect_setting_conflicts(&config).is_clean());
    }

    #[test]
    fn test_non_numeric_domain_setting() {
        let mut config = Configuration::new();
        config
            .push(
                Setting::new(
                    "CPU_FREQ",
                    Category::Cpu,
                    SettingValue::string("fast").unwrap(),
                    0,
                    0,
                )
                .unwrap(),
            )
            .unwrap();

        let report = validate_cpu_settings(&config);
        assert!(!report.passed());
        assert!(report.issues()[0].message.contains("numeric"));
    }

    #[test]
    fn test_conflict_requires_both_conditions() {
        let cases = [
            (4500u32, 2000u32, true),
            (4500, 3000, false),
            (3200, 2000, false),
            (4000, 2000, false),
            (4500, 2400, false),
        ];

        for (cpu, mem, expected) in cases {
            let mut config = default_configuration();
            config.set_by_name("CPU_FREQ", cpu).unwrap();
            config.set_by_name("MEMORY_FREQ", mem).unwrap();

            let report = detect_setting_conflicts(&config);
            assert_eq!(report.has_warnings(), expected, "cpu={cpu} mem={mem}");
            assert!(report.passed());
        }
    }

    #[test]
    fn test_validate_all_order() {
        let mut config = default_configuration();
        config.set_by_name("CPU_FREQ", 6000u32).unwrap();
        config.set_by_name("MEMORY_FREQ", 2000u32).unwrap();

        let report = validate_all(&config);
        let found: Vec<_> = report
            .issues()
            .iter()
            .map(|i| (i.setting.as_str(), i.severity))
            .collect();

        assert_eq!(
            found,
            vec![
                ("CPU_FREQ", Severity::Error),
                ("CPU_FREQ", Severity::Error),
                ("CPU_FREQ/MEMORY_FREQ", Severity::Warning),
            ]
        );
    }
}
