//! Store configuration
//!
//! - `StoreConfig` - where the configuration file lives and how it is encoded
//! - `StoreConfigBuilder` - fluent builder with `~` expansion and defaults

mod types;

pub use types::{DEFAULT_APP_DIR, DEFAULT_FILE_NAME, PRESET_DIR, StoreConfig, StoreConfigBuilder};
