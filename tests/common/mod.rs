//! Common test utilities for syscfg integration tests
//!
//! Provides shared test fixtures and helpers for building raw SYSC images.

#![allow(dead_code)]

use std::path::PathBuf;
use syscfg::codec::{self, HEADER_SIZE, RECORD_SIZE};
use syscfg::{ConfigManager, Configuration, StoreConfig, default_configuration};
use tempfile::TempDir;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture that provides a temporary directory and configured ConfigManager
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub manager: ConfigManager,
}

impl TestFixture {
    /// Create a new test fixture with default configuration
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = StoreConfig::builder().config_dir(temp_dir.path()).build();
        let manager = ConfigManager::new(store);

        Self { temp_dir, manager }
    }

    /// Fresh manager over the same directory, as a second run of a program would see it
    pub fn reopen(&self) -> ConfigManager {
        ConfigManager::new(StoreConfig::builder().config_dir(self.temp_dir.path()).build())
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("default.bin")
    }

    /// Write raw bytes as the configuration file
    pub fn write_raw(&self, bytes: &[u8]) {
        std::fs::write(self.config_path(), bytes).expect("Failed to write config file");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Raw Image Helpers
// =============================================================================

/// Encoded default configuration
pub fn default_image() -> Vec<u8> {
    codec::serialize(&default_configuration())
}

/// Byte offset of record `index` within an image
pub fn record_offset(index: usize) -> usize {
    HEADER_SIZE + index * RECORD_SIZE
}

/// Overwrite the header's setting count
pub fn set_count(image: &mut [u8], count: u16) {
    image[6..8].copy_from_slice(&count.to_le_bytes());
}

/// Overwrite the header's stored checksum
pub fn set_checksum(image: &mut [u8], checksum: u16) {
    image[12..14].copy_from_slice(&checksum.to_le_bytes());
}

/// Stored checksum in an image
pub fn stored_checksum(image: &[u8]) -> u16 {
    u16::from_le_bytes([image[12], image[13]])
}

/// Recompute and store the checksum over whatever records the image holds
pub fn fix_checksum(image: &mut [u8]) {
    let sum = codec::checksum_bytes(&image[HEADER_SIZE..]);
    set_checksum(image, sum);
}

/// Settings names in order
pub fn names(config: &Configuration) -> Vec<String> {
    config.iter().map(|s| s.name().to_string()).collect()
}
