/// Template matching data types
use crate::anchor::{Point, TemplateSize};
use crate::capture::Frame;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A reference image loaded once for the run
#[derive(Clone, Debug)]
pub struct Template {
    /// Where the glyph was loaded from
    pub path: PathBuf,
    /// File stem used in diagnostics (e.g., "btn_send")
    pub name: String,
    pub pixels: Frame,
}

/// Best placement of the template inside the frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    pub top_left: Point,
    /// Normalized correlation coefficient (0.0-1.0)
    pub confidence: f32,
}

impl Template {
    pub fn new(path: impl Into<PathBuf>, pixels: Frame) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self { path, name, pixels }
    }

    pub fn size(&self) -> TemplateSize {
        TemplateSize::new(self.pixels.width(), self.pixels.height())
    }
}

impl MatchResult {
    pub fn new(x: i32, y: i32, confidence: f32) -> Self {
        Self {
            top_left: Point::new(x, y),
            confidence,
        }
    }

    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    /// Format match with correlation percentage
    pub fn describe(&self, template: &Template) -> String {
        let correlation_pct = (self.confidence * 100.0) as u32;
        format!(
            "{} at ({},{}) - {}%",
            template.name, self.top_left.x, self.top_left.y, correlation_pct
        )
    }
}
