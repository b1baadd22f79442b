//! Canonical default configuration
//!
//! The order and values below are the implicit schema of the SYSC format:
//! files written by other tools expect exactly these twelve records.

use log::{debug, error};

use crate::model::configuration::Configuration;
use crate::model::setting::{Category, Setting, SettingValue};

/// One row of the default table
struct DefaultSetting {
    name: &'static str,
    category: Category,
    value: SettingValue,
    min: u32,
    max: u32,
}

fn row(
    name: &'static str,
    category: Category,
    value: SettingValue,
    min: u32,
    max: u32,
) -> DefaultSetting {
    DefaultSetting {
        name,
        category,
        value,
        min,
        max,
    }
}

fn toggle(name: &'static str, category: Category, on: bool) -> DefaultSetting {
    row(name, category, SettingValue::Bool(on), 0, 1)
}

fn default_table() -> [DefaultSetting; 12] {
    use Category::{Boot, Cpu, Io, Memory};
    use SettingValue::{UInt8, UInt32};

    [
        // CPU
        row("CPU_FREQ", Cpu, UInt32(3200), 800, 5000),
        toggle("CPU_CACHE", Cpu, true),
        toggle("VIRTUALIZATION", Cpu, true),
        // Memory
        row("MEMORY_FREQ", Memory, UInt32(2400), 1333, 4000),
        toggle("MEMORY_TEST", Memory, false),
        toggle("ECC_ENABLE", Memory, false),
        // Boot
        toggle("FAST_BOOT", Boot, true),
        toggle("SECURE_BOOT", Boot, true),
        row("BOOT_TIMEOUT", Boot, UInt8(5), 0, 30),
        // I/O
        toggle("USB_ENABLE", Io, true),
        // 0=IDE, 1=AHCI, 2=RAID
        row("SATA_MODE", Io, UInt8(1), 0, 2),
        toggle("NETWORK_BOOT", Io, false),
    ]
}

/// Build the canonical twelve-setting configuration
///
/// Every call returns a fresh value with a consistent header.
///
/// # Example
///
/// ```
/// use syscfg::default_configuration;
///
/// let config = default_configuration();
/// assert_eq!(config.len(), 12);
/// assert_eq!(config.get_by_name("CPU_FREQ")?.value().as_u32(), Some(3200));
/// # Ok::<(), syscfg::Error>(())
/// ```
#[must_use]
pub fn default_configuration() -> Configuration {
    let mut config = Configuration::new();
    for entry in default_table() {
        let name = entry.name;
        let added = Setting::new(name, entry.category, entry.value, entry.min, entry.max)
            .and_then(|setting| config.push(setting));
        if let Err(e) = added {
            error!("Default setting {name} could not be added: {e}");
        }
    }
    debug!("Default configuration initialized: {} settings", config.len());
    config
}
