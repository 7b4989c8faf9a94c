use crate::config::{DEFAULT_ADB_PATH, DEFAULT_TEMPLATE_PATH, OffsetConfig, ProbeConfig};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Offsets and box sizes beyond this cannot land on any real screen
pub const MAX_OFFSET: i32 = 100_000;

pub const VERSION_DISPLAY: &str = env!("APP_VERSION_DISPLAY");

/// Parse the process arguments.
///
/// `Ok(None)` means help or version was printed and the program should
/// exit successfully; `Err` carries a message for an invalid flag.
pub fn parse() -> Result<Option<ProbeConfig>, String> {
    parse_from(std::env::args().skip(1))
}

pub fn parse_from<I, S>(args: I) -> Result<Option<ProbeConfig>, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = ProbeConfig::default();
    let mut offsets = OffsetConfig::default();

    for arg in args {
        let arg = arg.as_ref();
        if arg == "--help" || arg == "-h" {
            print_help();
            return Ok(None);
        } else if arg == "--version" || arg == "-v" {
            println!(
                "ADB Anchor Probe v{VERSION_DISPLAY} (c) {}",
                env!("APP_BUILD_YEAR")
            );
            return Ok(None);
        } else if arg == "--debug" {
            config.debug = true;
        } else if arg == "--no-window" {
            config.show_window = false;
        } else if arg == "--json" {
            config.json_report = true;
        } else if let Some(val) = arg.strip_prefix("--adb=") {
            config.adb_path = non_empty_path("--adb", val)?;
        } else if let Some(val) = arg.strip_prefix("--serial=") {
            if val.is_empty() {
                return Err("❌ --serial requires a device serial".to_string());
            }
            config.serial = Some(val.to_string());
        } else if let Some(val) = arg.strip_prefix("--template=") {
            config.template_path = non_empty_path("--template", val)?;
        } else if let Some(val) = arg.strip_prefix("--offset-x=") {
            offsets.offset_x = parse_offset("--offset-x", val)?;
        } else if let Some(val) = arg.strip_prefix("--offset-y=") {
            offsets.offset_y = parse_offset("--offset-y", val)?;
        } else if let Some(val) = arg.strip_prefix("--box-width=") {
            offsets.box_width = parse_positive("--box-width", val)?;
        } else if let Some(val) = arg.strip_prefix("--box-height=") {
            offsets.box_height = parse_positive("--box-height", val)?;
        } else if let Some(val) = arg.strip_prefix("--threshold=") {
            let threshold: f32 = parse_value("--threshold", val)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(format!("❌ --threshold must be within 0.0..=1.0, got {val}"));
            }
            config.confidence_threshold = threshold;
        } else if let Some(val) = arg.strip_prefix("--timeout=") {
            let secs: u64 = parse_value("--timeout", val)?;
            if secs == 0 {
                return Err("❌ --timeout must be at least 1 second".to_string());
            }
            config.capture_timeout = Some(Duration::from_secs(secs));
        } else if let Some(val) = arg.strip_prefix("--save=") {
            config.save_path = Some(non_empty_path("--save", val)?);
        } else if let Some(val) = arg.strip_prefix("--ocr-preview=") {
            config.ocr_preview_path = Some(non_empty_path("--ocr-preview", val)?);
        } else {
            return Err(format!("❌ Unknown argument: {arg} (see --help)"));
        }
    }

    config.offsets = offsets;
    Ok(Some(config))
}

fn parse_value<T: FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.trim()
        .parse::<T>()
        .map_err(|_| format!("❌ Invalid value for {flag}: {val}"))
}

fn parse_offset(flag: &str, val: &str) -> Result<i32, String> {
    let n: i32 = parse_value(flag, val)?;
    if n.unsigned_abs() > MAX_OFFSET.unsigned_abs() {
        return Err(format!(
            "❌ {flag} must be within -{MAX_OFFSET}..={MAX_OFFSET}, got {n}"
        ));
    }
    Ok(n)
}

fn parse_positive(flag: &str, val: &str) -> Result<i32, String> {
    let n: i32 = parse_value(flag, val)?;
    if n <= 0 || n > MAX_OFFSET {
        return Err(format!("❌ {flag} must be within 1..={MAX_OFFSET}, got {n}"));
    }
    Ok(n)
}

fn non_empty_path(flag: &str, val: &str) -> Result<PathBuf, String> {
    if val.is_empty() {
        return Err(format!("❌ {flag} requires a path"));
    }
    Ok(PathBuf::from(val))
}

fn print_help() {
    let defaults = OffsetConfig::default();
    println!("⚓ ADB Anchor Probe");
    println!("   Locate a button on a device screenshot and show the OCR box anchored to it.");
    println!();
    println!("USAGE:");
    println!("    adb-anchor-probe [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --adb=PATH          adb executable (default: {DEFAULT_ADB_PATH})");
    println!("    --serial=ID         Device serial, passed as 'adb -s ID'");
    println!("    --template=PATH     Button template (default: {DEFAULT_TEMPLATE_PATH})");
    println!("    --offset-x=N        OCR box X offset from the button center (default: {})", defaults.offset_x);
    println!("    --offset-y=N        OCR box Y offset from the button center (default: {})", defaults.offset_y);
    println!("    --box-width=N       OCR box width (default: {})", defaults.box_width);
    println!("    --box-height=N      OCR box height (default: {})", defaults.box_height);
    println!("    --threshold=F       Warn below this match confidence (default: 0.8)");
    println!("    --timeout=N         Abort the screen capture after N seconds");
    println!("    --save=PATH         Save the annotated screenshot");
    println!("    --ocr-preview=PATH  Save the preprocessed OCR crop");
    println!("    --no-window         Do not open the preview window");
    println!("    --json              Print the result as JSON on stdout");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    adb-anchor-probe");
    println!("    adb-anchor-probe --offset-x=-40 --offset-y=-57 --box-width=80 --box-height=24");
    println!("    adb-anchor-probe --serial=emulator-5554 --no-window --save=debug.png --json");
}
