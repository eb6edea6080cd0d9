use ihexline::transport::{self, BAUD_RATES, DEFAULT_BAUD_RATE, TERMINATOR};
use ihexline::{Board, HexFile, Programmer, RecordType, SerialSpecs};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!(" ---------------------------------------------------------------");
    println!("|  Intel HEX Sender  | v{version} - Copyright (c) 2026 Ihar Hlukhau |");
    println!(" ---------------------------------------------------------------");
    println!("\nUsage:");
    println!("  hexsend info <input>");
    println!("  hexsend ports [--all]");
    println!("  hexsend boards");
    println!("  hexsend signature --port <name> --board <board> [options]");
    println!("  hexsend send <input> --port <name> [--board <board>] [options]");
    println!("  hexsend listen --port <name> [options]");
    println!("\nOptions:");
    println!("  --baud <val>       Baud rate (default: {DEFAULT_BAUD_RATE})");
    println!("  --delay <ms>       Pause after every sent line (default: 50)");
    println!("  --verbose          Log every transmitted line");
    println!("\nExamples:");
    println!("  hexsend info firmware.hex");
    println!("  hexsend signature --port COM3 --board \"Arduino UNO\"");
    println!("  hexsend send firmware.hex --port /dev/ttyUSB0 --board STM32F103 --baud 115200");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    println!();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let level = if args.iter().any(|a| a == "--verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Keep going without logs if no terminal is attached
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let command = &args[1];

    // Dispatch and immediately handle results
    if let Err(e) = run_dispatch(command, &args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(cmd: &str, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        "info" => {
            // Guard: Check args count
            let path_str = args.get(2).ok_or("Missing input file path")?;

            // Guard: File must exist
            let abs_path = validate_exists(path_str)?;

            run_info(&abs_path)
        }
        "ports" => run_ports(args.iter().any(|a| a == "--all")),
        "boards" => {
            for board in Board::ALL {
                println!("{:<14} {}", board.name(), board.signature());
            }
            Ok(())
        }
        "signature" => {
            let specs = get_serial_specs(args)?;
            let board: Board = get_flag_value(args, "--board")
                .ok_or("Missing '--board' flag or the value after it")?
                .parse()?;

            run_signature(&specs, board)
        }
        "send" => {
            // Guard: Check input given and exists
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let abs_path = validate_exists(path_str)?;

            let specs = get_serial_specs(args)?;
            let board = match get_flag_value(args, "--board") {
                Some(b) => Some(b.parse::<Board>()?),
                None => None,
            };

            run_send(&abs_path, &specs, board)
        }
        "listen" => {
            let specs = get_serial_specs(args)?;
            run_listen(&specs)
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn run_info(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    fn format_addr(addr: usize) -> String {
        let s = format!("{addr:08X}");
        format!("0x{}_{}", &s[0..4], &s[4..8])
    }

    let hf = HexFile::from_hex(path)?;

    println!("File Path:   {}", path.display());
    println!("Records:     {}", hf.len());
    println!("Data Size:   {} bytes", hf.data_size());
    if let Some(range) = hf.address_range() {
        println!(
            "Range:       {} - {}",
            format_addr(*range.start()),
            format_addr(*range.end())
        );
    }
    if let Some(start) = hf.start_address() {
        println!("Start:       {}", format_addr(start));
    }
    println!("Terminated:  {}", if hf.is_terminated() { "yes" } else { "no" });

    println!("\nRecord types:");
    for rtype in [
        RecordType::Data,
        RecordType::EndOfFile,
        RecordType::ExtendedSegmentAddress,
        RecordType::StartSegmentAddress,
        RecordType::ExtendedLinearAddress,
        RecordType::StartLinearAddress,
    ] {
        let count = hf.count(rtype);
        if count > 0 {
            println!("  {:<32} {count}", rtype.to_string());
        }
    }
    Ok(())
}

fn run_ports(all: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ports = if all {
        transport::list_ports()?
    } else {
        transport::detect_ports()?
    };

    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}", port.label());
    }
    Ok(())
}

fn run_signature(specs: &SerialSpecs, board: Board) -> Result<(), Box<dyn std::error::Error>> {
    let mut programmer: Programmer = Programmer::new();
    programmer.connect(specs)?;
    programmer.select_board(board);
    programmer.check_signature()?;

    println!("Sent signature '{}' to {}", board.signature(), specs.device);
    Ok(())
}

fn run_send(
    path: &PathBuf,
    specs: &SerialSpecs,
    board: Option<Board>,
) -> Result<(), Box<dyn std::error::Error>> {
    let hf = HexFile::from_hex(path)?;

    let mut programmer: Programmer = Programmer::new();
    programmer.connect(specs)?;

    if let Some(board) = board {
        programmer.select_board(board);
        programmer.check_signature()?;
    }

    let sent = programmer.program(&hf, |sent, total| {
        print!("\rSending: {sent}/{total}");
        let _ = io::stdout().flush();
    })?;
    println!();

    println!("Sent {sent} line(s) of {} to {}", hf.name, specs.device);
    Ok(())
}

fn run_listen(specs: &SerialSpecs) -> Result<(), Box<dyn std::error::Error>> {
    let port = transport::open_port(specs)?;
    let mut reader = BufReader::new(port);

    println!("Listening on {} (stops after '{TERMINATOR}')", specs.device);
    let count = transport::receive_lines(&mut reader, |line| {
        println!("{line}");
        line != TERMINATOR
    })?;

    println!("Received {count} line(s)");
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Build serial settings from `--port`, `--baud` and `--delay`
fn get_serial_specs(args: &[String]) -> Result<SerialSpecs, Box<dyn std::error::Error>> {
    let port = get_flag_value(args, "--port").ok_or("Missing '--port' flag or the value after it")?;
    let mut specs = SerialSpecs::new(transport::port_from_label(&port));

    if let Some(baud) = get_flag_value(args, "--baud") {
        specs.baudrate = baud
            .parse()
            .map_err(|_e| format!("Invalid baud rate: {baud}"))?;
        if !BAUD_RATES.contains(&specs.baudrate) {
            log::warn!("non-standard baud rate {}", specs.baudrate);
        }
    }

    if let Some(delay) = get_flag_value(args, "--delay") {
        let ms: u64 = delay
            .parse()
            .map_err(|_e| format!("Invalid delay: {delay}"))?;
        specs.line_delay = Duration::from_millis(ms);
    }

    Ok(specs)
}

/// Validate that a path exists and is a file. Returns absolute path.
fn validate_exists(path_str: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = PathBuf::from(path_str);
    if !path.exists() {
        return Err(format!("File not found: {path_str}").into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {path_str}").into());
    }
    // Return absolute path
    Ok(std::fs::canonicalize(path)?)
}

/// Find the value after a specific flag (e.g., "--baud 115200")
fn get_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}
