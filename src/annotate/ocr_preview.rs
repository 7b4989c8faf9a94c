//! Preview of the OCR input derived from the target region
//!
//! Applies the same preprocessing the downstream OCR step uses (crop,
//! grayscale, upscale small crops, inverted binarisation, white padding) so
//! the operator can judge whether the offsets capture the text cleanly.

use crate::anchor::AnchorRegion;
use crate::capture::Frame;
use crate::error::{ProbeError, ProbeResult};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::contrast::{ThresholdType, threshold};
use std::path::Path;

/// Crops shorter than this are upscaled before binarisation
const UPSCALE_BELOW_HEIGHT: u32 = 50;
const UPSCALE_FACTOR: u32 = 3;
const BINARY_THRESHOLD: u8 = 150;
const BORDER: u32 = 10;

/// Build the preprocessed OCR crop, or `None` if the target region does not
/// overlap the frame at all.
pub fn ocr_preview(frame: &Frame, anchor: &AnchorRegion) -> Option<GrayImage> {
    let (x, y, w, h) = clamp_to_frame(frame, anchor)?;
    let cropped = imageops::crop_imm(frame, x, y, w, h).to_image();
    let gray = imageops::grayscale(&cropped);

    let scaled = if gray.height() < UPSCALE_BELOW_HEIGHT {
        imageops::resize(
            &gray,
            gray.width() * UPSCALE_FACTOR,
            gray.height() * UPSCALE_FACTOR,
            FilterType::CatmullRom,
        )
    } else {
        gray
    };

    // Dark text on a white background
    let binary = threshold(&scaled, BINARY_THRESHOLD, ThresholdType::BinaryInverted);

    let mut padded = GrayImage::from_pixel(
        binary.width() + 2 * BORDER,
        binary.height() + 2 * BORDER,
        Luma([255]),
    );
    imageops::replace(&mut padded, &binary, i64::from(BORDER), i64::from(BORDER));
    Some(padded)
}

/// Write the OCR preview to `path`. Returns `false` when the region is
/// entirely off-screen and nothing was written.
pub fn save_ocr_preview(frame: &Frame, anchor: &AnchorRegion, path: &Path) -> ProbeResult<bool> {
    let Some(preview) = ocr_preview(frame, anchor) else {
        return Ok(false);
    };
    preview.save(path).map_err(|e| ProbeError::Output {
        path: path.to_path_buf(),
        description: e.to_string(),
    })?;
    Ok(true)
}

/// Intersect the target rectangle with the frame as (x, y, width, height)
fn clamp_to_frame(frame: &Frame, anchor: &AnchorRegion) -> Option<(u32, u32, u32, u32)> {
    let left = anchor.target_top_left.x.max(0);
    let top = anchor.target_top_left.y.max(0);
    let right = anchor.target_bottom_right.x.min(frame.width() as i32);
    let bottom = anchor.target_bottom_right.y.min(frame.height() as i32);
    if right <= left || bottom <= top {
        return None;
    }
    Some((
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}
