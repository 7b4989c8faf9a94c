//! Anchor geometry: button center and the OCR region offset from it.

use crate::config::OffsetConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, saturating at the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Width and height of the matched template in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateSize {
    pub width: u32,
    pub height: u32,
}

impl TemplateSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnchorRegion {
    /// Center of the matched button
    pub center: Point,
    pub target_top_left: Point,
    pub target_bottom_right: Point,
}

impl AnchorRegion {
    pub fn target_width(&self) -> i32 {
        self.target_bottom_right.x.saturating_sub(self.target_top_left.x)
    }

    pub fn target_height(&self) -> i32 {
        self.target_bottom_right.y.saturating_sub(self.target_top_left.y)
    }
}

/// Map a match location to the anchor center and the OCR target box.
///
/// Half sizes use truncating integer division, so an 81 px wide template
/// puts the center 40 px from its left edge.
pub fn compute_anchor(top_left: Point, size: TemplateSize, offsets: &OffsetConfig) -> AnchorRegion {
    let center = top_left.offset((size.width / 2) as i32, (size.height / 2) as i32);
    let target_top_left = center.offset(offsets.offset_x, offsets.offset_y);
    let target_bottom_right = target_top_left.offset(offsets.box_width, offsets.box_height);

    AnchorRegion {
        center,
        target_top_left,
        target_bottom_right,
    }
}
