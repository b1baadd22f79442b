//! Ready-made configurations derived from the defaults

use log::debug;

use crate::defaults::default_configuration;
use crate::error::Result;
use crate::model::configuration::Configuration;

/// Named preset configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Factory defaults
    Default,
    /// Faster processor and memory, fast boot on
    Performance,
    /// Conservative clocks with ECC and memory test on
    Stability,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Default, Preset::Performance, Preset::Stability];

    /// File name the preset is written under
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Preset::Default => "default.bin",
            Preset::Performance => "performance.bin",
            Preset::Stability => "stability.bin",
        }
    }

    /// Build the preset configuration
    ///
    /// # Errors
    ///
    /// Only fails if the default table no longer carries one of the settings a
    /// preset overrides.
    ///
    /// # Example
    ///
    /// ```
    /// use syscfg::presets::Preset;
    ///
    /// let config = Preset::Performance.build()?;
    /// assert_eq!(config.get_by_name("CPU_FREQ")?.value().as_u32(), Some(4200));
    /// # Ok::<(), syscfg::Error>(())
    /// ```
    pub fn build(self) -> Result<Configuration> {
        let mut config = default_configuration();

        match self {
            Preset::Default => {}
            Preset::Performance => {
                config.set_by_name("CPU_FREQ", 4200u32)?;
                config.set_by_name("MEMORY_FREQ", 3200u32)?;
                config.set_by_name("FAST_BOOT", true)?;
            }
            Preset::Stability => {
                config.set_by_name("CPU_FREQ", 3000u32)?;
                config.set_by_name("MEMORY_FREQ", 2400u32)?;
                config.set_by_name("ECC_ENABLE", true)?;
                config.set_by_name("MEMORY_TEST", true)?;
            }
        }

        debug!("Built {self:?} preset");
        Ok(config)
    }
}
