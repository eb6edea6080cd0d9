use crate::ui_popup::Popup;
use ihexline::transport::{self, DEFAULT_BAUD_RATE};
use ihexline::{Board, HexFile, PortInfo, Programmer, SerialSpecs, TransferError};
use log::{info, warn};

pub mod colors {
    use eframe::egui::Color32;

    pub const GRAY_160: Color32 = Color32::from_gray(160);
    pub const GREEN: Color32 = Color32::from_rgb(90, 170, 100);
    pub const SHADOW: Color32 = Color32::from_black_alpha(150);
    pub const STRIPE: Color32 = Color32::from_rgba_premultiplied(6, 6, 6, 6);
}

pub struct ProgrammerApp {
    /// Loaded Intel HEX file. `None` until a file is loaded.
    pub hex: Option<HexFile>,
    /// Board picked in the combobox, not yet confirmed
    pub board_choice: Option<Board>,
    /// Serial connection and the confirmed board
    pub programmer: Programmer,
    /// Ports found by the last refresh
    pub ports: Vec<PortInfo>,
    /// Label of the port picked in the combobox
    pub port_choice: Option<String>,
    /// Baud rate picked in the combobox
    pub baudrate: u32,
    /// Pop up handler
    pub popup: Popup,
}

impl ProgrammerApp {
    /// Create the app and run the first port detection.
    pub(crate) fn new() -> Self {
        let mut app = Self {
            hex: None,
            board_choice: None,
            programmer: Programmer::new(),
            ports: Vec::new(),
            port_choice: None,
            baudrate: DEFAULT_BAUD_RATE,
            popup: Popup::default(),
        };
        app.refresh_ports();
        app
    }

    /// Re-detect USB/UART ports and preselect the first one.
    pub(crate) fn refresh_ports(&mut self) {
        self.ports = match transport::detect_ports() {
            Ok(ports) => ports,
            Err(err) => {
                warn!("port detection failed: {err}");
                Vec::new()
            }
        };

        self.port_choice = self.ports.first().map(PortInfo::label);
    }

    /// Confirm the board picked in the combobox
    pub(crate) fn select_board(&mut self) {
        match self.board_choice {
            Some(board) => {
                self.programmer.select_board(board);
                self.popup.info(format!("Selected board: {board}"));
            }
            None => self.popup.error("Please select a valid board!"),
        }
    }

    pub(crate) fn connect(&mut self) {
        let Some(label) = self.port_choice.as_deref() else {
            self.popup.error("No COM port selected!");
            return;
        };

        let specs = SerialSpecs {
            baudrate: self.baudrate,
            ..SerialSpecs::new(transport::port_from_label(label))
        };

        match self.programmer.connect(&specs) {
            Ok(()) => self.popup.info(format!(
                "Connected to {} at {} baud.",
                specs.device, specs.baudrate
            )),
            Err(err) => self
                .popup
                .error(format!("Failed to open serial port:\n{err}")),
        }
    }

    pub(crate) fn disconnect(&mut self) {
        if self.programmer.disconnect().is_some() {
            info!("serial port closed");
            self.popup.info("UART connection closed.");
        }
    }

    pub(crate) fn check_signature(&mut self) {
        match self.programmer.check_signature() {
            Ok(board) => self
                .popup
                .info(format!("Signature {} sent successfully!", board.signature())),
            Err(err) => self.popup.error(transfer_message("send signature", &err)),
        }
    }

    pub(crate) fn program_device(&mut self) {
        if !self.programmer.is_connected() {
            self.popup.error(transfer_message("send data", &TransferError::NotConnected));
            return;
        }
        let Some(hex) = self.hex.as_ref() else {
            self.popup.error("No HEX file loaded!");
            return;
        };

        match self.programmer.program(hex, |_, _| {}) {
            Ok(sent) => self
                .popup
                .info(format!("HEX file transmitted successfully! ({sent} lines)")),
            Err(err) => self.popup.error(transfer_message("send data", &err)),
        }
    }
}

/// Pop-up text for a failed transfer step
fn transfer_message(action: &str, err: &TransferError) -> String {
    match err {
        TransferError::NoBoardSelected => "Please select a board first!".to_string(),
        TransferError::NotConnected => "UART connection not established!".to_string(),
        _ => format!("Failed to {action}:\n{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_message() {
        assert_eq!(
            transfer_message("send signature", &TransferError::NoBoardSelected),
            "Please select a board first!"
        );
        assert_eq!(
            transfer_message("send data", &TransferError::NotConnected),
            "UART connection not established!"
        );
        assert_eq!(
            transfer_message("send data", &TransferError::NoRecords),
            "Failed to send data:\nNo HEX records loaded"
        );
    }
}
