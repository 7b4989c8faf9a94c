// Core capture types and traits
use crate::error::ProbeResult;
use image::RgbImage;

/// 8-bit, 3-channel pixel grid. Annotation draws into it in place.
pub type Frame = RgbImage;

// Source of raw (still encoded) screenshot bytes
#[allow(async_fn_in_trait)]
pub trait FrameProvider {
    async fn capture_bytes(&self) -> ProbeResult<Vec<u8>>;

    // Human readable description used in diagnostics
    fn describe(&self) -> String;
}

/// Decodes compressed image bytes into a 3-channel frame.
pub trait ImageCodec {
    fn decode(&self, bytes: &[u8], source_name: &str) -> ProbeResult<Frame>;
}
