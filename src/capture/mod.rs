// Capture module - acquires one screenshot from an Android device
// through the external `adb` tool and decodes it into a frame.

pub mod codec;
pub mod shell;
pub mod types;


pub use codec::StandardCodec;
pub use shell::AdbShellCapture;
pub use types::{Frame, FrameProvider, ImageCodec};

use crate::error::{ProbeError, ProbeResult};

/// Capture raw bytes from `provider` and decode them with `codec`.
///
/// An empty byte stream means the device produced nothing and is reported
/// as capture unavailability; undecodable bytes are a decode failure.
pub async fn capture_frame<P, C>(provider: &P, codec: &C) -> ProbeResult<Frame>
where
    P: FrameProvider,
    C: ImageCodec,
{
    let bytes = provider.capture_bytes().await?;
    if bytes.is_empty() {
        return Err(ProbeError::capture_unavailable(format!(
            "{} produced 0 bytes",
            provider.describe()
        )));
    }
    log::debug!("Captured {} bytes from {}", bytes.len(), provider.describe());
    codec.decode(&bytes, "screenshot")
}
