//! The `record` module defines [`HexRecord`] and [`RecordType`] which are used for parsing
//! (and re-encoding) single Intel HEX record lines.
//!
//! Field layout of a record line:
//!
//! ```text
//! : BB AAAA TT DD..DD CC
//! | |  |    |  |     +-- checksum (two's complement of the sum of all preceding bytes)
//! | |  |    |  +-------- data, `BB` bytes
//! | |  |    +----------- record type
//! | |  +---------------- load offset
//! | +------------------- byte count
//! +--------------------- start code
//! ```

use crate::error::{MalformedKind, ParseError};
use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

mod ranges {
    use std::ops::Range;
    pub const RECORD_LEN_RANGE: Range<usize> = 1..3;
    pub const RECORD_ADDR_RANGE: Range<usize> = 3..7;
    pub const RECORD_TYPE_RANGE: Range<usize> = 7..9;
}
mod sizes {
    pub const BYTE_CHAR_LEN: usize = 2;
    // start code + (len + addr + rtype + checksum)
    pub const SMALLEST_RECORD: usize = 1 + (1 + 2 + 1 + 1) * BYTE_CHAR_LEN;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    Data,
    EndOfFile,
    ExtendedSegmentAddress,
    StartSegmentAddress,
    ExtendedLinearAddress,
    StartLinearAddress,
    Unknown(u8),
}

impl From<u8> for RecordType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Data,
            0x01 => Self::EndOfFile,
            0x02 => Self::ExtendedSegmentAddress,
            0x03 => Self::StartSegmentAddress,
            0x04 => Self::ExtendedLinearAddress,
            0x05 => Self::StartLinearAddress,
            other => Self::Unknown(other),
        }
    }
}

impl From<RecordType> for u8 {
    fn from(rtype: RecordType) -> Self {
        match rtype {
            RecordType::Data => 0x00,
            RecordType::EndOfFile => 0x01,
            RecordType::ExtendedSegmentAddress => 0x02,
            RecordType::StartSegmentAddress => 0x03,
            RecordType::ExtendedLinearAddress => 0x04,
            RecordType::StartLinearAddress => 0x05,
            RecordType::Unknown(other) => other,
        }
    }
}

impl RecordType {
    /// Human-readable name of the record type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::EndOfFile => "End Of File",
            Self::ExtendedSegmentAddress => "Extended Segment Address",
            Self::StartSegmentAddress => "Start Segment Address",
            Self::ExtendedLinearAddress => "Extended Linear Address",
            Self::StartLinearAddress => "Start Linear Address",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} ({})", u8::from(*self), self.name())
    }
}

/// One decoded Intel HEX record. Instances are only produced by [`parse_line`]
/// or [`HexRecord::new`], so the checksum always matches the contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    byte_count: u8,
    address: u16,
    record_type: RecordType,
    data: Vec<u8>,
    checksum: u8,
}

/// Calculate the two's-complement checksum of a byte slice.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    let mut sum: u8 = 0;
    for b in bytes {
        sum = sum.wrapping_add(*b);
    }
    (!sum).wrapping_add(1) // two's complement
}

impl HexRecord {
    /// Build a record from its fields, computing byte count and checksum.
    ///
    /// # Errors
    /// Returns [`MalformedKind::TooLong`] if the payload exceeds 255 bytes.
    ///
    /// # Example
    /// ```
    /// use ihexline::{HexRecord, RecordType};
    ///
    /// let eof = HexRecord::new(0, RecordType::EndOfFile, Vec::new()).unwrap();
    /// assert_eq!(eof.to_line(), ":00000001FF");
    /// ```
    pub fn new(
        address: u16,
        record_type: RecordType,
        data: Vec<u8>,
    ) -> Result<Self, MalformedKind> {
        let byte_count = u8::try_from(data.len()).map_err(|_| MalformedKind::TooLong)?;

        let mut record = Self {
            byte_count,
            address,
            record_type,
            data,
            checksum: 0,
        };
        record.checksum = record.computed_checksum();

        Ok(record)
    }

    #[must_use]
    pub const fn byte_count(&self) -> u8 {
        self.byte_count
    }

    #[must_use]
    pub const fn address(&self) -> u16 {
        self.address
    }

    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        self.record_type
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Checksum computed from byte count, address, record type and data.
    #[must_use]
    pub fn computed_checksum(&self) -> u8 {
        let [addr_high_byte, addr_low_byte] = self.address.to_be_bytes();
        let header = [
            self.byte_count,
            addr_high_byte,
            addr_low_byte,
            u8::from(self.record_type),
        ];

        let sum = header
            .iter()
            .chain(&self.data)
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        (!sum).wrapping_add(1) // two's complement
    }

    /// Checksum matches and the data length agrees with the byte count.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.checksum == self.computed_checksum() && self.data.len() == self.byte_count as usize
    }

    /// Data bytes as an uppercase hex string (no separators).
    #[must_use]
    pub fn data_hex(&self) -> String {
        self.data.iter().fold(
            String::with_capacity(self.data.len() * sizes::BYTE_CHAR_LEN),
            |mut s, b| {
                let _ = write!(s, "{b:02X}");
                s
            },
        )
    }

    /// Re-encode the record into its canonical (uppercase) line, without a newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":{:02X}{:04X}{:02X}{}{:02X}",
            self.byte_count,
            self.address,
            u8::from(self.record_type),
            self.data_hex(),
            self.checksum
        )
    }
}

impl FromStr for HexRecord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)
    }
}

/// Value of a single ASCII hex digit. Callers validate the digit beforehand.
const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Byte encoded by the two hex digits starting at `pos`.
const fn byte_at(raw: &[u8], pos: usize) -> u8 {
    (nibble(raw[pos]) << 4) | nibble(raw[pos + 1])
}

/// Parse one text line into a [`HexRecord`].
///
/// Trailing whitespace (including `\r\n`) is ignored. Checks run in this order:
/// start code, hex characters, minimum length, even length, declared payload
/// fits into the line, checksum, exact length.
///
/// # Errors
/// - [`ParseError::NotARecord`] if the line does not start with `:`
/// - [`ParseError::Malformed`] on any structural violation
/// - [`ParseError::ChecksumMismatch`] if the checksum byte is wrong
///
/// # Example
/// ```
/// use ihexline::{parse_line, RecordType};
///
/// let record = parse_line(":020000040800F2").unwrap();
/// assert_eq!(record.record_type(), RecordType::ExtendedLinearAddress);
/// assert_eq!(record.data(), &[0x08, 0x00]);
/// ```
pub fn parse_line(line: &str) -> Result<HexRecord, ParseError> {
    let line = line.trim_end();

    // Check for start code
    if !line.starts_with(':') {
        return Err(ParseError::NotARecord);
    }

    let raw = line.as_bytes();

    // Validate all characters are hexadecimal
    if !raw[1..].iter().all(u8::is_ascii_hexdigit) {
        return Err(ParseError::Malformed(MalformedKind::InvalidCharacters));
    }

    // Validate record's size
    if raw.len() < sizes::SMALLEST_RECORD {
        return Err(ParseError::Malformed(MalformedKind::TooShort));
    } else if (raw.len() - 1) % sizes::BYTE_CHAR_LEN != 0 {
        return Err(ParseError::Malformed(MalformedKind::OddLength));
    }

    let byte_count = byte_at(raw, ranges::RECORD_LEN_RANGE.start);
    let declared = byte_count as usize;
    let found = (raw.len() - sizes::SMALLEST_RECORD) / sizes::BYTE_CHAR_LEN;

    // Declared payload has to fit in front of the checksum
    let data_end = ranges::RECORD_TYPE_RANGE.end + sizes::BYTE_CHAR_LEN * declared;
    let record_end = data_end + sizes::BYTE_CHAR_LEN;
    if record_end > raw.len() {
        return Err(ParseError::Malformed(
            MalformedKind::PayloadLengthMismatch { declared, found },
        ));
    }

    let address = u16::from_be_bytes([
        byte_at(raw, ranges::RECORD_ADDR_RANGE.start),
        byte_at(raw, ranges::RECORD_ADDR_RANGE.start + sizes::BYTE_CHAR_LEN),
    ]);
    let record_type = RecordType::from(byte_at(raw, ranges::RECORD_TYPE_RANGE.start));

    let data: Vec<u8> = (ranges::RECORD_TYPE_RANGE.end..data_end)
        .step_by(sizes::BYTE_CHAR_LEN)
        .map(|i| byte_at(raw, i))
        .collect();

    // Checksum is always the last byte of the line
    let checksum = byte_at(raw, raw.len() - sizes::BYTE_CHAR_LEN);

    let record = HexRecord {
        byte_count,
        address,
        record_type,
        data,
        checksum,
    };

    let expected = record.computed_checksum();
    if expected != checksum {
        return Err(ParseError::ChecksumMismatch {
            expected,
            found: checksum,
        });
    }

    // Surplus digits between data and checksum
    if record_end != raw.len() {
        return Err(ParseError::Malformed(
            MalformedKind::PayloadLengthMismatch { declared, found },
        ));
    }

    Ok(record)
}
