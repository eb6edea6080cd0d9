//! The `error` module defines the errors reported by `ihexline`:
//! 1. [`ParseError`] - why a single line is not a valid record.
//! 2. [`HexError`] - a [`ParseError`] bound to the 1-based line number of a hex file.
//! 3. [`TransferError`] - what went wrong while talking to a board over the serial port.

use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not begin with a ':' (comment or blank line)
    NotARecord,
    /// Line begins with a ':' but its structure is broken
    Malformed(MalformedKind),
    /// Checksum byte does not match the record contents
    ChecksumMismatch { expected: u8, found: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARecord => {
                write!(f, "Missing start code ':'")
            }
            Self::Malformed(kind) => {
                write!(f, "Malformed record: {kind}")
            }
            Self::ChecksumMismatch { expected, found } => {
                write!(
                    f,
                    "Invalid record checksum - expected: 0x{expected:02X}, found: 0x{found:02X}"
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// Record contains non-hexadecimal characters
    InvalidCharacters,
    /// Record is shorter than the smallest valid
    TooShort,
    /// Record payload does not fit into a single record
    TooLong,
    /// Record has an odd number of hex digits
    OddLength,
    /// Number of data bytes differs from the record's byte count
    PayloadLengthMismatch { declared: usize, found: usize },
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacters => {
                write!(f, "record contains invalid character(s)")
            }
            Self::TooShort => {
                write!(f, "record too short")
            }
            Self::TooLong => {
                write!(f, "record payload longer than 255 bytes")
            }
            Self::OddLength => {
                write!(f, "record with uneven length")
            }
            Self::PayloadLengthMismatch { declared, found } => {
                write!(
                    f,
                    "byte count declares {declared} data bytes, found {found}"
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexError {
    ParseRecordError(ParseError, usize),
}

impl HexError {
    /// Line number (1-based) at which decoding failed.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::ParseRecordError(_, line) => *line,
        }
    }

    /// Underlying record error.
    #[must_use]
    pub const fn kind(&self) -> ParseError {
        match self {
            Self::ParseRecordError(kind, _) => *kind,
        }
    }
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseRecordError(base_err, line) => {
                write!(
                    f,
                    "Error encountered during record parsing at line #{line} of the hex file:\n{base_err}",
                )
            }
        }
    }
}

#[derive(Debug)]
pub enum TransferError {
    /// No serial port is open
    NotConnected,
    /// No target board has been chosen
    NoBoardSelected,
    /// Nothing to send
    NoRecords,
    /// Writing to or reading from the port failed
    Io(io::Error),
    /// Enumerating or opening the port failed
    Port(serialport::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "UART connection not established"),
            Self::NoBoardSelected => write!(f, "No board selected"),
            Self::NoRecords => write!(f, "No HEX records loaded"),
            Self::Io(err) => write!(f, "Serial I/O failed: {err}"),
            Self::Port(err) => write!(f, "Serial port error: {err}"),
        }
    }
}

impl From<io::Error> for TransferError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serialport::Error> for TransferError {
    fn from(err: serialport::Error) -> Self {
        Self::Port(err)
    }
}

impl Error for ParseError {}
impl Error for MalformedKind {}
impl Error for HexError {}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Port(err) => Some(err),
            _ => None,
        }
    }
}
