use super::types::{Frame, ImageCodec};
use crate::error::{ProbeError, ProbeResult};

/// Decoder backed by the `image` crate (PNG and JPEG).
///
/// Alpha channels are dropped so screenshots with transparency compare
/// against 3-channel templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCodec;

impl ImageCodec for StandardCodec {
    fn decode(&self, bytes: &[u8], source_name: &str) -> ProbeResult<Frame> {
        if bytes.is_empty() {
            return Err(ProbeError::decode(source_name, "no image data"));
        }
        let image =
            image::load_from_memory(bytes).map_err(|e| ProbeError::decode(source_name, e))?;
        log::debug!(
            "Decoded {} as {}x{} ({:?})",
            source_name,
            image.width(),
            image.height(),
            image.color()
        );
        Ok(image.to_rgb8())
    }
}
