//! Binary codec for the SYSC configuration file format.
//!
//! File layout:
//! ```text
//! header:  [signature:4 "SYSC"][version:2][setting_count:2][data_size:4][checksum:2][reserved:2]
//! record:  [name:32][category:1][type:1][size:1][flags:1][data:16][min:4][max:4]
//! ```
//! Header size: 16 bytes. Record size: 60 bytes, repeated `setting_count` times
//! with no padding. All multi-byte integers are little-endian.
//!
//! The checksum is the sum, modulo 2^16, of every byte of every setting record
//! in record order, including unused bytes of the value buffer. It is an
//! additive checksum and not a CRC: reordering records, or any change that
//! keeps the byte sum constant, goes undetected. Existing files depend on this
//! exact algorithm, so it must not be replaced by a stronger hash.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::configuration::{ConfigHeader, Configuration, MAX_SETTINGS, SettingList};
use crate::model::setting::{
    Category, MAX_VALUE_LEN, NAME_FIELD_LEN, RawValue, Setting, SettingFlags, SettingName,
    SettingValue,
};

/// File signature
pub const SIGNATURE: [u8; 4] = *b"SYSC";

/// Format version stamped on every write
pub const FORMAT_VERSION: u16 = 1;

/// Encoded header size
pub const HEADER_SIZE: usize = 16;

/// Encoded setting record size
pub const RECORD_SIZE: usize = 60;

const NAME_FIELD: usize = NAME_FIELD_LEN;
const CATEGORY_OFFSET: usize = 32;
const TYPE_OFFSET: usize = 33;
const SIZE_OFFSET: usize = 34;
const FLAGS_OFFSET: usize = 35;
const DATA_OFFSET: usize = 36;
const MIN_OFFSET: usize = DATA_OFFSET + MAX_VALUE_LEN;
const MAX_OFFSET: usize = MIN_OFFSET + 4;

/// Stored and recomputed checksums that disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumMismatch {
    /// Value found in the header
    pub stored: u16,
    /// Value computed over the record bytes as read
    pub computed: u16,
}

impl From<ChecksumMismatch> for Error {
    fn from(m: ChecksumMismatch) -> Self {
        Error::ChecksumMismatch {
            stored: m.stored,
            computed: m.computed,
        }
    }
}

/// A structurally valid configuration plus its integrity status
///
/// A checksum mismatch does not fail a parse: the configuration is still
/// returned so callers can recover what they can from a damaged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub config: Configuration,
    pub checksum_mismatch: Option<ChecksumMismatch>,
}

impl ParseOutcome {
    /// True if the header checksum matched the records
    #[must_use]
    pub fn is_intact(&self) -> bool {
        self.checksum_mismatch.is_none()
    }

    /// Treat a checksum mismatch as an error
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChecksumMismatch`] if the stored checksum was wrong.
    pub fn into_strict(self) -> Result<Configuration> {
        match self.checksum_mismatch {
            Some(mismatch) => Err(mismatch.into()),
            None => Ok(self.config),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Additive 16-bit checksum over the encoded form of `settings`
#[must_use]
pub fn checksum(settings: &[Setting]) -> u16 {
    settings
        .iter()
        .map(|s| checksum_bytes(&encode_record(s)))
        .fold(0u16, u16::wrapping_add)
}

/// Additive 16-bit checksum over raw record bytes
#[must_use]
pub fn checksum_bytes(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Decodes a configuration from `bytes`.
///
/// Bytes after the last declared record are ignored.
///
/// # Errors
///
/// * [`Error::Truncated`] if the header or the declared records do not fit
/// * [`Error::InvalidSignature`] if the first four bytes are not `"SYSC"`
/// * [`Error::TooManySettings`] if the header declares more than 64 records
///
/// Record contents never fail a parse. Unknown category or type tags, sizes
/// that do not fit the type and non-binary booleans are kept as
/// [`Category::Unknown`] and [`SettingValue::Invalid`] and reported by the
/// validator. A name field without a terminator is read in full, and a name
/// that is not UTF-8 is read lossily.
///
/// # Examples
///
/// ```rust
/// use syscfg::codec::{parse, serialize};
/// use syscfg::default_configuration;
///
/// let config = default_configuration();
/// let outcome = parse(&serialize(&config)).unwrap();
/// assert!(outcome.is_intact());
/// assert_eq!(outcome.config.settings(), config.settings());
/// ```
pub fn parse(bytes: &[u8]) -> Result<ParseOutcome> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::Truncated {
            section: "header",
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let header = decode_header(&bytes[..HEADER_SIZE]);
    if header.signature != SIGNATURE {
        return Err(Error::InvalidSignature {
            found: header.signature,
        });
    }

    let count = usize::from(header.setting_count);
    if count > MAX_SETTINGS {
        return Err(Error::TooManySettings {
            count,
            max: MAX_SETTINGS,
        });
    }

    let body_len = count * RECORD_SIZE;
    let available = bytes.len() - HEADER_SIZE;
    if available < body_len {
        return Err(Error::Truncated {
            section: "settings",
            needed: body_len,
            available,
        });
    }
    let body = &bytes[HEADER_SIZE..HEADER_SIZE + body_len];

    let mut settings = SettingList::new();
    for (index, record) in body.chunks_exact(RECORD_SIZE).enumerate() {
        let setting = decode_record(index, record);
        settings.push(setting).map_err(|_| Error::TooManySettings {
            count,
            max: MAX_SETTINGS,
        })?;
    }

    let computed = checksum_bytes(body);
    let checksum_mismatch = if computed == header.checksum {
        None
    } else {
        warn!(
            "Checksum mismatch (calculated: {computed:04X}, expected: {:04X})",
            header.checksum
        );
        Some(ChecksumMismatch {
            stored: header.checksum,
            computed,
        })
    };

    debug!("Decoded configuration: {count} settings");

    Ok(ParseOutcome {
        config: Configuration::from_parts(header, settings),
        checksum_mismatch,
    })
}

/// Encodes `config` as header followed by one record per setting.
///
/// The header is rebuilt from the settings, so the output is self-consistent
/// even if the in-memory header is stale.
#[must_use]
pub fn serialize(config: &Configuration) -> Vec<u8> {
    let header = config.stamped_header();

    let mut buf = Vec::with_capacity(HEADER_SIZE + config.len() * RECORD_SIZE);
    encode_header(&mut buf, &header);
    for setting in config {
        buf.extend_from_slice(&encode_record(setting));
    }
    buf
}

// ── Header ────────────────────────────────────────────────────────────────────

fn encode_header(buf: &mut Vec<u8>, h: &ConfigHeader) {
    buf.extend_from_slice(&h.signature);
    buf.extend_from_slice(&h.version.to_le_bytes());
    buf.extend_from_slice(&h.setting_count.to_le_bytes());
    buf.extend_from_slice(&h.data_size.to_le_bytes());
    buf.extend_from_slice(&h.checksum.to_le_bytes());
    buf.extend_from_slice(&h.reserved.to_le_bytes());
}

/// `bytes` must hold at least `HEADER_SIZE` bytes
fn decode_header(bytes: &[u8]) -> ConfigHeader {
    ConfigHeader {
        signature: [bytes[0], bytes[1], bytes[2], bytes[3]],
        version: read_u16(bytes, 4),
        setting_count: read_u16(bytes, 6),
        data_size: read_u32(bytes, 8),
        checksum: read_u16(bytes, 12),
        reserved: read_u16(bytes, 14),
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Fixed-width on-disk form of one setting
#[must_use]
pub fn encode_record(setting: &Setting) -> [u8; RECORD_SIZE] {
    let mut rec = [0u8; RECORD_SIZE];

    // a 32-byte name read from an unterminated field is written back as is
    let name = setting.name().as_bytes();
    rec[..name.len()].copy_from_slice(name);

    rec[CATEGORY_OFFSET] = setting.category().tag();
    rec[TYPE_OFFSET] = setting.setting_type().tag();
    // at most MAX_VALUE_LEN for typed values, the stored byte for invalid ones
    rec[SIZE_OFFSET] = setting.size() as u8;
    rec[FLAGS_OFFSET] = setting.flags().bits();

    let data = &mut rec[DATA_OFFSET..MIN_OFFSET];
    match setting.value() {
        SettingValue::UInt8(v) => data[0] = *v,
        SettingValue::UInt16(v) => data[..2].copy_from_slice(&v.to_le_bytes()),
        SettingValue::UInt32(v) => data[..4].copy_from_slice(&v.to_le_bytes()),
        SettingValue::Bool(v) => data[0] = u8::from(*v),
        SettingValue::String(s) => data[..s.len()].copy_from_slice(s.as_bytes()),
        SettingValue::Invalid(raw) => data.copy_from_slice(&raw.data),
    }

    rec[MIN_OFFSET..MAX_OFFSET].copy_from_slice(&setting.min().to_le_bytes());
    rec[MAX_OFFSET..RECORD_SIZE].copy_from_slice(&setting.max().to_le_bytes());
    rec
}

/// `rec` must hold exactly `RECORD_SIZE` bytes
fn decode_record(index: usize, rec: &[u8]) -> Setting {
    let name = decode_name(&rec[..NAME_FIELD]);
    let category = Category::from(rec[CATEGORY_OFFSET]);

    let mut data = [0u8; MAX_VALUE_LEN];
    data.copy_from_slice(&rec[DATA_OFFSET..MIN_OFFSET]);
    let value = SettingValue::from_raw(RawValue {
        type_tag: rec[TYPE_OFFSET],
        size: rec[SIZE_OFFSET],
        data,
    });
    if let Some(defect) = value.defect() {
        debug!("Record {index} ({name}) kept as raw bytes: {defect}");
    }

    let min = read_u32(rec, MIN_OFFSET);
    let max = read_u32(rec, MAX_OFFSET);
    let flags = SettingFlags::from_bits_retain(rec[FLAGS_OFFSET]);

    Setting::from_record(name, category, value, min, max, flags)
}

/// Name up to the first NUL, or the whole field if there is none
fn decode_name(field: &[u8]) -> SettingName {
    let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let mut name = SettingName::new();
    for c in String::from_utf8_lossy(&field[..len]).chars() {
        // replacement characters can outgrow the field
        if name.push(c).is_err() {
            break;
        }
    }
    name
}

// ── Primitive helpers ─────────────────────────────────────────────────────────

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
