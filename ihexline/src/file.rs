//! The `file` module decodes whole Intel HEX files.
//!
//! [`parse_file`] turns a sequence of lines into records, and [`HexFile`] is the
//! loaded firmware: the accepted raw lines (which are what gets transmitted to
//! a board), the matching parsed records, and some file metadata.
//!
//! Decoding rules shared by both:
//! - blank lines and lines without a ':' start code are skipped,
//! - any other error aborts with the 1-based line number of the failing line,
//! - decoding stops after the first end-of-file record; trailing lines are ignored.

use crate::error::{HexError, ParseError};
use crate::record::{HexRecord, RecordType, parse_line};
use std::error::Error;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Decode lines into `(line index, record)` pairs following the module rules.
fn decode<I, S>(lines: I) -> Result<Vec<(usize, HexRecord)>, HexError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut accepted = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end();

        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(record) => {
                let is_eof = record.record_type() == RecordType::EndOfFile;
                accepted.push((index, record));
                if is_eof {
                    break;
                }
            }
            Err(ParseError::NotARecord) => {}
            Err(err) => return Err(HexError::ParseRecordError(err, index + 1)),
        }
    }

    Ok(accepted)
}

/// Decode a sequence of lines into records.
///
/// # Errors
/// Returns [`HexError::ParseRecordError`] with the 1-based line number of the
/// first line that is malformed or has a bad checksum.
///
/// # Example
/// ```
/// use ihexline::{parse_file, RecordType};
///
/// let text = ":0B0010006164647265737320676F6E9B\n:00000001FF\ngarbage after eof\n";
/// let records = parse_file(text.lines()).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].record_type(), RecordType::EndOfFile);
/// ```
pub fn parse_file<I, S>(lines: I) -> Result<Vec<HexRecord>, HexError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(decode(lines)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct HexFile {
    /// Intel HEX file path
    pub filepath: PathBuf,
    /// File name shown to the user
    pub name: String,
    /// Intel HEX file size in bytes
    pub size: usize,
    /// Accepted raw lines, trailing whitespace removed
    lines: Vec<String>,
    /// Parsed records, index-aligned with `lines`
    records: Vec<HexRecord>,
}

impl<'a> IntoIterator for &'a HexFile {
    type Item = (&'a str, &'a HexRecord);
    type IntoIter = std::iter::Zip<
        std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>,
        std::slice::Iter<'a, HexRecord>,
    >;
    fn into_iter(self) -> Self::IntoIter {
        let as_str: fn(&'a String) -> &'a str = String::as_str;
        self.lines.iter().map(as_str).zip(self.records.iter())
    }
}

impl HexFile {
    /// Creates empty `HexFile` struct instance.
    ///
    /// # Examples
    /// ```
    /// use ihexline::HexFile;
    ///
    /// let hf = HexFile::new();
    /// assert!(hf.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filepath: PathBuf::new(),
            name: String::new(),
            size: 0,
            lines: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Clears loaded data from the `HexFile` struct instance.
    pub fn clear(&mut self) {
        self.filepath.clear();
        self.name.clear();
        self.size = 0;
        self.lines.clear();
        self.records.clear();
    }

    /// Parse hex text and replace the records held by `self`.
    /// On error `self` is left untouched.
    ///
    /// # Errors
    /// Returns an error if a record is malformed or has a bad checksum.
    ///
    /// # Example
    /// ```
    /// use ihexline::HexFile;
    ///
    /// let mut hf = HexFile::new();
    /// hf.parse(":020000040800F2\r\n:00000001FF\r\n").unwrap();
    ///
    /// assert_eq!(hf.lines(), &[":020000040800F2", ":00000001FF"]);
    /// ```
    pub fn parse(&mut self, text: &str) -> Result<(), HexError> {
        let raw_lines: Vec<&str> = text.lines().collect();
        let decoded = decode(&raw_lines)?;

        let (lines, records): (Vec<String>, Vec<HexRecord>) = decoded
            .into_iter()
            .map(|(index, record)| (raw_lines[index].trim_end().to_string(), record))
            .unzip();

        self.lines = lines;
        self.records = records;

        Ok(())
    }

    /// Creates a `HexFile` instance and fills it with data from the provided hex file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    ///
    /// # Example
    /// ```
    /// use ihexline::HexFile;
    ///
    /// let hf = HexFile::from_hex("tests/fixtures/blink.hex").unwrap();
    /// assert_eq!(hf.name, "blink.hex");
    /// ```
    pub fn from_hex<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn Error>> {
        let mut hf = Self::new();
        hf.load_hex(filepath)?;
        Ok(hf)
    }

    /// Fills a `HexFile` instance with data from the provided hex file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. Parse errors can be
    /// downcast to [`HexError`].
    pub fn load_hex<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), Box<dyn Error>> {
        // Read the contents of the file
        let text = std::fs::read_to_string(&filepath)?;

        // Parse into a fresh instance so a failed load keeps the old contents
        let mut hf = Self::new();
        hf.parse(&text)?;

        hf.size = text.len();
        hf.filepath = filepath.as_ref().to_path_buf();
        hf.name = filepath.as_ref().file_name().map_or_else(
            || "Untitled".to_string(),
            |n| n.to_string_lossy().into_owned(),
        );

        *self = hf;
        Ok(())
    }

    /// Accepted raw lines, in file order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Parsed records, index-aligned with [`HexFile::lines`].
    #[must_use]
    pub fn records(&self) -> &[HexRecord] {
        &self.records
    }

    /// Get an iterator over `(raw line, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HexRecord)> {
        self.into_iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether decoding ended on an end-of-file record.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.records
            .last()
            .is_some_and(|r| r.record_type() == RecordType::EndOfFile)
    }

    /// Number of records of the given type.
    #[must_use]
    pub fn count(&self, rtype: RecordType) -> usize {
        self.records
            .iter()
            .filter(|r| r.record_type() == rtype)
            .count()
    }

    /// Total payload bytes carried by data records.
    #[must_use]
    pub fn data_size(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.record_type() == RecordType::Data)
            .map(|r| r.data().len())
            .sum()
    }

    /// Lowest and highest absolute address covered by data records, applying
    /// extended segment and extended linear address records.
    #[must_use]
    pub fn address_range(&self) -> Option<RangeInclusive<usize>> {
        let mut offset: usize = 0;
        let mut range: Option<(usize, usize)> = None;

        for record in &self.records {
            let data = record.data();
            match record.record_type() {
                RecordType::Data if !data.is_empty() => {
                    let start = offset + record.address() as usize;
                    let end = start + data.len() - 1;
                    range = Some(range.map_or((start, end), |(lo, hi)| {
                        (lo.min(start), hi.max(end))
                    }));
                }
                RecordType::ExtendedSegmentAddress if data.len() == 2 => {
                    offset = (data[0] as usize * 256 + data[1] as usize) * 16;
                }
                RecordType::ExtendedLinearAddress if data.len() == 2 => {
                    offset = (data[0] as usize * 256 + data[1] as usize) * 65536;
                }
                _ => {}
            }
        }

        range.map(|(lo, hi)| lo..=hi)
    }

    /// Execution start address from a start linear (EIP) or start segment
    /// (CS:IP) address record, if the file carries one.
    #[must_use]
    pub fn start_address(&self) -> Option<usize> {
        self.records.iter().find_map(|r| {
            let d = r.data();
            match (r.record_type(), d.len()) {
                (RecordType::StartLinearAddress, 4) => {
                    Some(u32::from_be_bytes([d[0], d[1], d[2], d[3]]) as usize)
                }
                (RecordType::StartSegmentAddress, 4) => {
                    let cs = u16::from_be_bytes([d[0], d[1]]) as usize;
                    let ip = u16::from_be_bytes([d[2], d[3]]) as usize;
                    Some(cs * 16 + ip)
                }
                _ => None,
            }
        })
    }
}
