use crate::app::ProgrammerApp;
use ihexline::{HexError, HexFile};
use log::info;
use std::error::Error;
use std::path::Path;

/// Turn a load failure into the text shown in the error pop-up.
/// Parser errors name the offending line.
pub fn load_error_message(err: &(dyn Error + 'static)) -> String {
    err.downcast_ref::<HexError>().map_or_else(
        || format!("Failed to read file:\n{err}"),
        |hex_err| {
            format!(
                "Failed to parse HEX file at line {}:\n{}",
                hex_err.line(),
                hex_err.kind()
            )
        },
    )
}

impl ProgrammerApp {
    /// Load hex file from disk, replacing the current one.
    /// On failure the current file stays loaded and an error pop-up is shown.
    pub(crate) fn load_file(&mut self, path: &Path) {
        match HexFile::from_hex(path) {
            Ok(hf) => {
                info!("loaded {} ({} records)", hf.name, hf.len());
                self.hex = Some(hf);
            }
            Err(err) => self.popup.error(load_error_message(err.as_ref())),
        }
    }

    /// Ask for a file with the native dialog and load it
    pub(crate) fn pick_and_load_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Load HEX File")
            .add_filter("HEX Files", &["hex", "ihx"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    pub(crate) fn close_file(&mut self) {
        self.hex = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ihexline::{MalformedKind, ParseError};
    use std::io;

    #[test]
    fn test_parse_error_message_has_line() {
        let err = HexError::ParseRecordError(ParseError::Malformed(MalformedKind::OddLength), 7);

        let msg = load_error_message(&err);

        assert!(msg.starts_with("Failed to parse HEX file at line 7"));
        assert!(msg.contains("uneven length"));
    }

    #[test]
    fn test_io_error_message() {
        let err = io::Error::new(io::ErrorKind::NotFound, "no such file");

        let msg = load_error_message(&err);

        assert_eq!(msg, "Failed to read file:\nno such file");
    }
}
