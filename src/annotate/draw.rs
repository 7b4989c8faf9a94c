//! Drawing of probe markers onto a frame

use crate::anchor::{AnchorRegion, Point, TemplateSize};
use crate::capture::Frame;
use crate::template_matching::MatchResult;
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

/// Dot at the anchor center
pub const ANCHOR_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Outline around the matched button
pub const MATCH_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Outline around the OCR region; must differ from `MATCH_COLOR`
pub const TARGET_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const ANCHOR_RADIUS: i32 = 5;
const STROKE_WIDTH: i32 = 2;

/// Draw the anchor dot, the match outline and the target outline, in that
/// order. Shapes partially outside the frame are clipped.
pub fn annotate(
    frame: &mut Frame,
    match_result: &MatchResult,
    template_size: TemplateSize,
    anchor: &AnchorRegion,
) {
    draw_filled_circle_mut(
        frame,
        (anchor.center.x, anchor.center.y),
        ANCHOR_RADIUS,
        ANCHOR_COLOR,
    );

    let match_bottom_right = match_result
        .top_left
        .offset(template_size.width as i32, template_size.height as i32);
    draw_box(frame, match_result.top_left, match_bottom_right, MATCH_COLOR);
    draw_box(
        frame,
        anchor.target_top_left,
        anchor.target_bottom_right,
        TARGET_COLOR,
    );
}

/// Outline from `top_left` to `bottom_right` (inclusive) with a stroke
/// growing inwards. Edges far outside the frame are pulled in to one pixel
/// past its border, which keeps them invisible and the rect within `i32`.
fn draw_box(frame: &mut Frame, top_left: Point, bottom_right: Point, color: Rgb<u8>) {
    let (frame_w, frame_h) = (i64::from(frame.width()), i64::from(frame.height()));
    for inset in 0..i64::from(STROKE_WIDTH) {
        let left = i64::from(top_left.x) + inset;
        let top = i64::from(top_left.y) + inset;
        let right = i64::from(bottom_right.x) - inset;
        let bottom = i64::from(bottom_right.y) - inset;
        if right < left || bottom < top {
            return;
        }
        if right < 0 || bottom < 0 || left >= frame_w || top >= frame_h {
            log::debug!(
                "Skipping box ({left},{top})-({right},{bottom}): outside {frame_w}x{frame_h}"
            );
            return;
        }
        let (left, top) = (left.max(-1), top.max(-1));
        let (right, bottom) = (right.min(frame_w), bottom.min(frame_h));
        let rect = Rect::at(left as i32, top as i32)
            .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
        draw_hollow_rect_mut(frame, rect, color);
    }
}
