//! # `ihexline`
//!
//! `ihexline` is a Rust library for decoding Intel HEX files line by line and
//! sending them to a microcontroller board over a serial port.
//!
//! The library provides:
//! - Record parser for single lines (via [`parse_line`] and [`HexRecord`]).
//! - Whole-file decoding (via [`parse_file`] and [`HexFile`]).
//! - Error handling with [`ParseError`], [`HexError`] and [`TransferError`].
//! - A plain-text serial transport (via [`Programmer`] and the `transport` functions).
//!
//! ## Example
//!
//! ```
//! use ihexline::{HexFile, RecordType};
//!
//! let hf = HexFile::from_hex("tests/fixtures/blink.hex").unwrap();
//! assert_eq!(hf.records().last().unwrap().record_type(), RecordType::EndOfFile);
//! ```

mod board;
mod error;
mod file;
mod record;
pub mod transport;

// Public APIs
pub use board::{Board, UnknownBoard};
pub use error::{HexError, MalformedKind, ParseError, TransferError};
pub use file::{HexFile, parse_file};
pub use record::{HexRecord, RecordType, checksum, parse_line};
pub use transport::{PortInfo, Programmer, SerialSpecs};
