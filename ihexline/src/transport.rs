//! The `transport` module moves hex lines to a board over a serial port.
//!
//! Wire format is plain text:
//! - signature check: `<SIGNATURE>\n`
//! - programming: every accepted raw line followed by `\n`, a fixed pause
//!   between lines, then the `END\n` terminator.
//!
//! There is no acknowledgment or retry. Writers are generic over [`Write`] so the
//! same code drives a real [`SerialPort`] and an in-memory buffer.

use crate::board::Board;
use crate::error::TransferError;
use crate::file::HexFile;
use log::{debug, info, warn};
use regex::Regex;
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use std::io::{BufRead, ErrorKind, Write};
use std::time::Duration;

/// Sentinel written after the last line of a program.
pub const TERMINATOR: &str = "END";
/// Pause after every transmitted line.
pub const LINE_DELAY: Duration = Duration::from_millis(50);
/// Read/write timeout of an opened port.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_BAUD_RATE: u32 = 38400;
pub const BAUD_RATES: [u32; 4] = [9600, 38400, 57600, 115_200];

/// Port descriptions that look like a USB-to-UART adapter.
const USB_UART_PATTERN: &str = r"USB|UART|CP210|CH340";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSpecs {
    pub device: String,
    pub baudrate: u32,
    pub timeout: Duration,
    pub line_delay: Duration,
}

impl SerialSpecs {
    #[must_use]
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }
}

impl Default for SerialSpecs {
    fn default() -> Self {
        Self {
            device: String::new(),
            baudrate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            line_delay: LINE_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub description: String,
}

impl PortInfo {
    /// Label shown in port pickers, `"<name> - <description>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

/// Recover the port name from a picker label (or a bare port name).
#[must_use]
pub fn port_from_label(label: &str) -> &str {
    label.split(" - ").next().unwrap_or(label).trim()
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb
                .product
                .as_deref()
                .or(usb.manufacturer.as_deref())
                .unwrap_or("Serial");
            format!("{product} (USB {:04X}:{:04X})", usb.vid, usb.pid)
        }
        SerialPortType::BluetoothPort => "Bluetooth serial link".to_string(),
        SerialPortType::PciPort => "PCI serial port".to_string(),
        SerialPortType::Unknown => "n/a".to_string(),
    }
}

fn is_usb_uart(description: &str) -> bool {
    Regex::new(USB_UART_PATTERN).is_ok_and(|re| re.is_match(description))
}

/// List every serial port known to the system.
///
/// # Errors
/// Returns an error if the system ports cannot be enumerated.
pub fn list_ports() -> Result<Vec<PortInfo>, TransferError> {
    let ports = serialport::available_ports()?
        .into_iter()
        .map(|p| PortInfo {
            description: describe(&p.port_type),
            name: p.port_name,
        })
        .collect();
    Ok(ports)
}

/// List serial ports that look like USB-to-UART adapters.
///
/// # Errors
/// Returns an error if the system ports cannot be enumerated.
pub fn detect_ports() -> Result<Vec<PortInfo>, TransferError> {
    let ports: Vec<PortInfo> = list_ports()?
        .into_iter()
        .filter(|p| is_usb_uart(&p.description))
        .collect();

    debug!("detected {} USB/UART port(s)", ports.len());
    Ok(ports)
}

/// Open a port with 8N1 framing and no flow control.
///
/// # Errors
/// Returns an error if the port cannot be opened.
pub fn open_port(specs: &SerialSpecs) -> Result<Box<dyn SerialPort>, TransferError> {
    let port = serialport::new(&specs.device, specs.baudrate)
        .timeout(specs.timeout)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open()?;

    info!("opened {} at {} baud", specs.device, specs.baudrate);
    Ok(port)
}

/// Write the board's signature followed by a newline.
///
/// # Errors
/// Returns an error if writing to the port fails.
pub fn send_signature<W: Write + ?Sized>(port: &mut W, board: Board) -> Result<(), TransferError> {
    port.write_all(board.signature().as_bytes())?;
    port.write_all(b"\n")?;
    port.flush()?;

    info!("sent signature {}", board.signature());
    Ok(())
}

/// Write every line followed by a newline, pausing `delay` after each one,
/// then write the terminator. `progress` is called with `(sent, total)`.
///
/// Returns the number of lines sent (terminator not included).
///
/// # Errors
/// - [`TransferError::NoRecords`] if `lines` is empty
/// - [`TransferError::Io`] if writing to the port fails
pub fn send_lines<W, S, F>(
    port: &mut W,
    lines: &[S],
    delay: Duration,
    mut progress: F,
) -> Result<usize, TransferError>
where
    W: Write + ?Sized,
    S: AsRef<str>,
    F: FnMut(usize, usize),
{
    if lines.is_empty() {
        return Err(TransferError::NoRecords);
    }

    let total = lines.len();

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        port.write_all(line.as_bytes())?;
        port.write_all(b"\n")?;
        port.flush()?;

        debug!("[{}/{total}] {line}", i + 1);
        progress(i + 1, total);

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    port.write_all(TERMINATOR.as_bytes())?;
    port.write_all(b"\n")?;
    port.flush()?;

    info!("sent {total} line(s) and terminator");
    Ok(total)
}

/// Receiver side: read newline-terminated lines and hand each trimmed,
/// non-empty line to `on_line` until the reader is exhausted or `on_line`
/// returns `false`. Read timeouts keep waiting; a partially received line is
/// kept until its newline arrives.
///
/// Returns the number of lines handed over.
///
/// # Errors
/// Returns an error if reading fails for any reason other than a timeout.
pub fn receive_lines<R, F>(reader: &mut R, mut on_line: F) -> Result<usize, TransferError>
where
    R: BufRead + ?Sized,
    F: FnMut(&str) -> bool,
{
    let mut count = 0;
    let mut buf = Vec::new();

    loop {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) if buf.is_empty() => break,
            Ok(_) => {
                // Last line of a stream may come without its newline
                let text = String::from_utf8_lossy(&buf).into_owned();
                buf.clear();

                let line = text.trim();
                if line.is_empty() {
                    continue;
                }

                count += 1;
                if !on_line(line) {
                    break;
                }
            }
            Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(count)
}

/// Connection and target state for one programming session.
pub struct Programmer<P = Box<dyn SerialPort>> {
    port: Option<P>,
    board: Option<Board>,
    line_delay: Duration,
}

impl<P: Write> Default for Programmer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Write> Programmer<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            port: None,
            board: None,
            line_delay: LINE_DELAY,
        }
    }

    /// Use an already opened port, dropping the previous one.
    pub fn attach(&mut self, port: P) {
        self.port = Some(port);
    }

    /// Release the port. Returns it if one was open.
    pub fn disconnect(&mut self) -> Option<P> {
        self.port.take()
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    pub const fn select_board(&mut self, board: Board) {
        self.board = Some(board);
    }

    #[must_use]
    pub const fn board(&self) -> Option<Board> {
        self.board
    }

    pub const fn set_line_delay(&mut self, delay: Duration) {
        self.line_delay = delay;
    }

    /// Send the selected board's signature.
    ///
    /// # Errors
    /// - [`TransferError::NoBoardSelected`] if no board is selected
    /// - [`TransferError::NotConnected`] if no port is open
    /// - [`TransferError::Io`] if writing fails
    pub fn check_signature(&mut self) -> Result<Board, TransferError> {
        let board = self.board.ok_or(TransferError::NoBoardSelected)?;
        let port = self.port.as_mut().ok_or(TransferError::NotConnected)?;

        send_signature(port, board)?;
        Ok(board)
    }

    /// Send all accepted lines of `file`, then the terminator.
    ///
    /// # Errors
    /// - [`TransferError::NotConnected`] if no port is open
    /// - [`TransferError::NoRecords`] if the file holds no records
    /// - [`TransferError::Io`] if writing fails
    pub fn program<F>(&mut self, file: &HexFile, progress: F) -> Result<usize, TransferError>
    where
        F: FnMut(usize, usize),
    {
        let port = self.port.as_mut().ok_or(TransferError::NotConnected)?;

        if !file.is_terminated() {
            warn!("{} has no end-of-file record", file.name);
        }

        send_lines(port, file.lines(), self.line_delay, progress)
    }
}

impl Programmer<Box<dyn SerialPort>> {
    /// Open the port described by `specs`, closing any port already open.
    ///
    /// # Errors
    /// Returns an error if the port cannot be opened.
    pub fn connect(&mut self, specs: &SerialSpecs) -> Result<(), TransferError> {
        if self.disconnect().is_some() {
            debug!("closed previous port");
        }

        let port = open_port(specs)?;
        self.attach(port);
        self.line_delay = specs.line_delay;
        Ok(())
    }

    /// Name of the open port, if the driver reports one.
    #[must_use]
    pub fn port_name(&self) -> Option<String> {
        self.port.as_ref().and_then(|p| p.name())
    }
}
