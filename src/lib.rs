//! # syscfg - System configuration store
//!
//! Typed, range-checked system settings (processor, memory, boot, I/O, power)
//! persisted in the fixed-layout SYSC binary format.
//!
//! ## Features
//!
//! - **Binary Codec**: 16-byte header plus 60-byte records, little-endian, with
//!   an additive 16-bit checksum
//! - **Typed Model**: every value is a [`SettingValue`] variant; raw bytes only
//!   exist inside the codec
//! - **Validation**: per-setting ranges, hardware safety bounds and
//!   cross-setting conflicts, reported as errors and warnings
//! - **Recovery**: a checksum mismatch is reported, not fatal
//! - **Presets**: default, performance and stability configurations
//! - **JSON export**: human-readable storage backend (`json` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use syscfg::{codec, default_configuration, validate_all};
//!
//! let mut config = default_configuration();
//! config.set_by_name("CPU_FREQ", 4500u32)?;
//!
//! // Setting never range-checks; validation is a separate step
//! let report = validate_all(&config);
//! assert!(report.passed());
//! assert!(report.has_warnings());
//!
//! let bytes = codec::serialize(&config);
//! let outcome = codec::parse(&bytes)?;
//! assert!(outcome.is_intact());
//! assert_eq!(outcome.config.settings(), config.settings());
//! # Ok::<(), syscfg::Error>(())
//! ```
//!
//! ## Working With Files
//!
//! ```rust,no_run
//! use syscfg::{ConfigManager, LoadStatus, StoreConfig};
//!
//! # fn example() -> syscfg::Result<()> {
//! let store = StoreConfig::builder()
//!     .config_dir("~/.config/syscfg")
//!     .build();
//! let mut manager = ConfigManager::new(store);
//!
//! match manager.load_or_default()? {
//!     LoadStatus::ChecksumMismatch(m) => eprintln!("file may be damaged: {m:?}"),
//!     status => println!("{status:?}"),
//! }
//!
//! manager.set_checked("BOOT_TIMEOUT", 10u8)?;
//! manager.save()?;
//! manager.generate_presets()?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod codec;
mod defaults;
pub mod display;
mod error;
mod manager;
pub mod model;
pub mod presets;
pub mod storage;
pub mod validator;

// Grouped modules
pub mod config;

// Re-exports from core
pub use codec::{ChecksumMismatch, ParseOutcome};
pub use defaults::default_configuration;
pub use error::{Error, Result};
pub use manager::{ConfigManager, LoadStatus};
pub use model::{
    Category, ConfigHeader, Configuration, MAX_SETTINGS, RawValue, Setting, SettingFlags,
    SettingType, SettingValue, ValueDefect,
};
pub use presets::Preset;
pub use storage::{BinaryStorage, StorageBackend};
pub use validator::{
    Issue, Safety, Severity, Validation, detect_setting_conflicts, validate_all,
    validate_boot_settings, validate_cpu_settings, validate_memory_settings, validate_setting,
    validate_setting_value,
};

#[cfg(feature = "json")]
pub use storage::JsonStorage;

// Re-exports from config
pub use config::{StoreConfig, StoreConfigBuilder};
