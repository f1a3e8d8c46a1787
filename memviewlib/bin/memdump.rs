use memviewlib::{
    CellMetrics, DisplayConfig, HexDisplay, Palette, RenderContext, SearchType, Settings,
    TextGrid, parse_hex_pattern,
};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// One character per pixel
const UNIT: CellMetrics = CellMetrics {
    width: 1.0,
    height: 1.0,
};

const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!(" ---------------------------------------------");
    println!("|  Memory Dump Utility  | v{version}              |");
    println!(" ---------------------------------------------");
    println!("\nUsage:");
    println!("  memdump dump <input> [options]");
    println!("  memdump diff <old> <new> [options]");
    println!("  memdump search <input> (--hex <bytes> | --ascii <text> | --regex <re>) [options]");
    println!("\nOptions:");
    println!("  --address <val>       Starting address of the input (default: 0x0)");
    println!("  --old-address <val>   Starting address of the old snapshot for diff");
    println!("  --new-address <val>   Starting address of the new snapshot for diff");
    println!("  --bpl <n>             Bytes per line (default: 16)");
    println!("  --config <file>       TOML display settings");
    println!("  --color               Print changed bytes in red");
    println!("\nExamples:");
    println!("  memdump dump stack.bin --address 0x7ffe0000");
    println!("  memdump diff before.bin after.bin --old-address 0x1000 --new-address 0xff8");
    println!("  memdump search firmware.bin --hex deadbeef --address 0x8000000");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

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
        "dump" => {
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let path = validate_exists(path_str)?;
            let address = get_address_flag(args, "--address")?;
            let settings = load_settings(args)?;

            run_dump(&path, address, &settings, has_flag(args, "--color"))
        }
        "diff" => {
            let old_str = args.get(2).ok_or("Missing old snapshot path")?;
            let new_str = args.get(3).ok_or("Missing new snapshot path")?;
            let old_path = validate_exists(old_str)?;
            let new_path = validate_exists(new_str)?;
            let old_address = get_address_flag(args, "--old-address")?;
            let new_address = match get_flag_value(args, "--new-address") {
                Some(_) => get_address_flag(args, "--new-address")?,
                None => old_address,
            };
            let settings = load_settings(args)?;

            run_diff(
                (&old_path, old_address),
                (&new_path, new_address),
                &settings,
                has_flag(args, "--color"),
            )
        }
        "search" => {
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let path = validate_exists(path_str)?;
            let address = get_address_flag(args, "--address")?;

            let pattern = if let Some(hex) = get_flag_value(args, "--hex") {
                SearchType::Hex(
                    parse_hex_pattern(&hex).ok_or_else(|| format!("Invalid hex pattern: {hex}"))?,
                )
            } else if let Some(text) = get_flag_value(args, "--ascii") {
                SearchType::Ascii(text)
            } else if let Some(re) = get_flag_value(args, "--regex") {
                SearchType::Regex(re)
            } else {
                return Err("Missing '--hex', '--ascii' or '--regex' pattern".into());
            };

            run_search(&path, address, &pattern)
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn run_dump(
    path: &PathBuf,
    address: u64,
    settings: &Settings,
    color: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let mut display = HexDisplay::with_data(text_config(settings), data, address);

    let grid = render_all(&mut display, &settings.palette);
    print_grid(&grid, &settings.palette, color);
    Ok(())
}

fn run_diff(
    old: (&PathBuf, u64),
    new: (&PathBuf, u64),
    settings: &Settings,
    color: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let old_data = std::fs::read(old.0)?;
    let new_data = std::fs::read(new.0)?;

    let mut display = HexDisplay::with_data(text_config(settings), old_data, old.1);
    display.set_new_offset(new.1, new_data);

    let grid = render_all(&mut display, &settings.palette);
    print_grid(&grid, &settings.palette, color);

    let ranges = dirty_ranges(display.dirty().mask());
    println!();
    println!(
        "Changed: {} of {} bytes",
        display.dirty().dirty_count(),
        display.len()
    );
    for (first, last) in ranges {
        let (first, last) = (display.address_of(first), display.address_of(last));
        if first == last {
            println!("  0x{first:X}");
        } else {
            println!("  0x{first:X}..=0x{last:X}");
        }
    }
    Ok(())
}

fn run_search(
    path: &PathBuf,
    address: u64,
    pattern: &SearchType,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let display = HexDisplay::with_data(DisplayConfig::default(), data, address);

    let hits = display.search(pattern);
    println!("Hits: {}", hits.len());
    for hit in hits {
        println!("  0x{hit:X}");
    }
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Display settings for text output: no top margin, unit cells
fn text_config(settings: &Settings) -> DisplayConfig {
    DisplayConfig {
        top_margin: 0.0,
        ..settings.display.clone()
    }
}

/// Render every line of the buffer into a grid
fn render_all(display: &mut HexDisplay, palette: &Palette) -> TextGrid {
    let layout = display.layout();
    let rows = layout.num_lines(display.len()).max(1);
    let mut grid = TextGrid::new(layout.total_chars_per_line(), rows, UNIT);

    display.set_cell_metrics(UNIT);
    let (width, height) = grid.pixel_size();
    display.resize(width, height);

    let mut ctx = RenderContext::new(palette.clone());
    ctx.show_cursor = false;
    display.render(&mut grid, &ctx);
    grid
}

fn print_grid(grid: &TextGrid, palette: &Palette, color: bool) {
    let lines = if color {
        grid.lines_marked(palette.dirty, ANSI_RED, ANSI_RESET)
    } else {
        grid.lines()
    };
    for line in lines {
        println!("{line}");
    }
}

/// Runs of dirty indices as inclusive `(first, last)` pairs
fn dirty_ranges(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (i, _) in mask.iter().enumerate().filter(|(_, dirty)| **dirty) {
        match ranges.last_mut() {
            Some((_, last)) if *last + 1 == i => *last = i,
            _ => ranges.push((i, i)),
        }
    }
    ranges
}

/// Settings from `--config`, defaults with 16 bytes per line otherwise. `--bpl` wins.
fn load_settings(args: &[String]) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match get_flag_value(args, "--config") {
        Some(path) => Settings::load(validate_exists(&path)?)?,
        None => {
            let mut settings = Settings::default();
            settings.display.bytes_per_line = 16;
            settings
        }
    };

    if let Some(bpl) = get_flag_value(args, "--bpl") {
        settings.display.bytes_per_line = bpl
            .parse()
            .map_err(|_e| format!("Invalid bytes per line: {bpl}"))?;
    }
    settings.display.validate()?;
    Ok(settings)
}

/// Parse a string as a hex number (with optional 0x prefix)
fn parse_hex_str(s: &str) -> Result<u64, std::num::ParseIntError> {
    let s = s.trim();

    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex_str, 16);
    }

    u64::from_str_radix(s, 16)
}

/// Value of an address flag, 0 when absent
fn get_address_flag(args: &[String], flag: &str) -> Result<u64, Box<dyn std::error::Error>> {
    match get_flag_value(args, flag) {
        Some(addr) => Ok(parse_hex_str(&addr).map_err(|_e| format!("Invalid address: {addr}"))?),
        None => Ok(0),
    }
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
    Ok(std::fs::canonicalize(path)?)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Find the value after a specific flag (e.g., "--bpl 16")
fn get_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}
