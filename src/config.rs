//! Configuration for a probe run
//!
//! Built once at startup from command-line flags and passed by reference
//! into every stage; nothing mutates it afterwards.

use std::path::PathBuf;
use std::time::Duration;

/// Default location of the `adb` executable (resolved through `PATH`).
pub const DEFAULT_ADB_PATH: &str = "adb";
/// Default button glyph used as the anchor template.
pub const DEFAULT_TEMPLATE_PATH: &str = "assets/btn_send.png";
/// Confidence below this only produces a warning.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;
/// Title of the operator preview window.
pub const WINDOW_TITLE: &str = "Debug Vision (Center Anchor)";

/// Offset from the anchor center to the OCR region, plus the region size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetConfig {
    pub offset_x: i32,
    pub offset_y: i32,
    pub box_width: i32,
    pub box_height: i32,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            offset_x: -40,
            offset_y: -57,
            box_width: 80,
            box_height: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Executable used for `exec-out screencap -p`
    pub adb_path: PathBuf,
    /// Optional device serial passed as `-s <serial>`
    pub serial: Option<String>,
    /// Button glyph to locate on the screenshot
    pub template_path: PathBuf,
    pub offsets: OffsetConfig,
    /// Advisory threshold (0.0 to 1.0); never aborts the run
    pub confidence_threshold: f32,
    /// Kill the capture command if it runs longer than this
    pub capture_timeout: Option<Duration>,
    /// Write the annotated frame here
    pub save_path: Option<PathBuf>,
    /// Write the preprocessed OCR crop here
    pub ocr_preview_path: Option<PathBuf>,
    pub show_window: bool,
    pub json_report: bool,
    pub debug: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from(DEFAULT_ADB_PATH),
            serial: None,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            offsets: OffsetConfig::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            capture_timeout: None,
            save_path: None,
            ocr_preview_path: None,
            show_window: true,
            json_report: false,
            debug: false,
        }
    }
}
