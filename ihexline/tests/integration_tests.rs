use ihexline::{
    Board, HexError, HexFile, MalformedKind, ParseError, Programmer, RecordType, parse_file,
};
use std::fs;
use std::time::Duration;

fn get_error(path: &str) -> HexError {
    match HexFile::from_hex(path) {
        Err(e) => *e
            .downcast::<HexError>()
            .unwrap_or_else(|e| panic!("Error was not a HexError: {e}")),
        Ok(_) => panic!("Expected an error, but got Ok"),
    }
}

#[test]
fn test_from_hex_crlf() {
    // Load hex and check the result
    let res = HexFile::from_hex("tests/fixtures/blink.hex");
    assert!(res.is_ok());

    if let Ok(hf) = res {
        assert_eq!(hf.name, "blink.hex");
        assert_eq!(hf.size, 533);
        assert_eq!(hf.len(), 13);
        assert_eq!(hf.data_size(), 182);
        assert_eq!(hf.address_range(), Some(0x0000..=0x00B5));
        assert!(hf.is_terminated());
    }
}

#[test]
fn test_from_hex_skips_comments_and_trailing_text() {
    let hf = HexFile::from_hex("tests/fixtures/stm32.hex").unwrap();

    assert_eq!(hf.len(), 7);
    assert_eq!(hf.count(RecordType::ExtendedLinearAddress), 1);
    assert_eq!(hf.count(RecordType::Data), 4);
    assert_eq!(hf.count(RecordType::StartLinearAddress), 1);
    assert_eq!(hf.address_range(), Some(0x0800_0000..=0x0800_003F));
    assert_eq!(hf.start_address(), Some(0x0800_0131));
    assert!(hf.lines().iter().all(|l| l.starts_with(':')));
}

#[test]
fn test_load_hex_keeps_previous_on_error() {
    // Arrange
    let mut hf = HexFile::new();
    hf.load_hex("tests/fixtures/blink.hex").unwrap();

    // Act
    let res = hf.load_hex("tests/fixtures/bad_checksum.hex");

    // Assert
    assert!(res.is_err());
    assert_eq!(hf.name, "blink.hex");
    assert_eq!(hf.len(), 13);
}

#[test]
fn test_lines_match_file_text() {
    // Arrange
    let text = fs::read_to_string("tests/fixtures/blink.hex").unwrap();
    let expected: Vec<&str> = text.lines().collect();

    // Act
    let hf = HexFile::from_hex("tests/fixtures/blink.hex").unwrap();

    // Assert
    assert_eq!(hf.lines(), expected.as_slice());
}

#[test]
fn test_parse_file_matches_hexfile() {
    let text = fs::read_to_string("tests/fixtures/stm32.hex").unwrap();

    let records = parse_file(text.lines()).unwrap();
    let hf = HexFile::from_hex("tests/fixtures/stm32.hex").unwrap();

    assert_eq!(records.as_slice(), hf.records());
}

#[test]
fn test_hex_parsing_returns_checksum_error() {
    let err = get_error("tests/fixtures/bad_checksum.hex");

    assert_eq!(
        err,
        HexError::ParseRecordError(
            ParseError::ChecksumMismatch {
                expected: 0xBE,
                found: 0x00
            },
            3
        )
    );
}

#[test]
fn test_hex_parsing_returns_malformed_error() {
    let err = get_error("tests/fixtures/malformed.hex");

    assert_eq!(err.line(), 2);
    assert_eq!(err.kind(), ParseError::Malformed(MalformedKind::OddLength));
}

#[test]
fn test_missing_file_is_io_error() {
    let res = HexFile::from_hex("tests/fixtures/does_not_exist.hex");

    let err = res.unwrap_err();
    assert!(err.downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn test_empty_file_loads_without_records() {
    let hf = HexFile::from_hex("tests/fixtures/empty.hex").unwrap();

    assert!(hf.is_empty());
    assert!(!hf.is_terminated());
}

#[test]
fn test_program_file_into_buffer() {
    // Arrange
    let hf = HexFile::from_hex("tests/fixtures/stm32.hex").unwrap();
    let mut programmer: Programmer<Vec<u8>> = Programmer::new();
    programmer.set_line_delay(Duration::ZERO);
    programmer.select_board(Board::Stm32f103);
    programmer.attach(Vec::new());

    // Act
    let sig = programmer.check_signature();
    let sent = programmer.program(&hf, |_, _| {});

    // Assert
    assert_eq!(sig.unwrap(), Board::Stm32f103);
    assert_eq!(sent.unwrap(), 7);

    let wire = String::from_utf8(programmer.disconnect().unwrap()).unwrap();
    let mut expected = String::from("STM32F103\n");
    for line in hf.lines() {
        expected.push_str(line);
        expected.push('\n');
    }
    expected.push_str("END\n");
    assert_eq!(wire, expected);
}
