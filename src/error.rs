use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// The error type for every stage of the probe pipeline.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Screen capture unavailable: {reason}")]
    CaptureUnavailable { reason: String },

    #[error("Screen capture timed out after {duration:?}. Is the device responsive?")]
    CaptureTimeout { duration: std::time::Duration },

    #[error("Template asset not found: {path:?}")]
    AssetMissing { path: PathBuf },

    #[error("Failed to decode {source_name} as an image: {description}")]
    DecodeFailure {
        source_name: String,
        description: String,
    },

    #[error(
        "Template {}x{} does not fit inside frame {}x{}",
        .template.0, .template.1, .frame.0, .frame.1
    )]
    InvalidTemplateSize {
        template: (u32, u32),
        frame: (u32, u32),
    },

    #[error("Display failed: {description}")]
    Display { description: String },

    #[error("Failed to write {path:?}: {description}")]
    Output { path: PathBuf, description: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ProbeError {
    /// Expected operational absences (no device, no asset) end the run
    /// early with a zero exit code instead of failing it.
    pub fn is_graceful(&self) -> bool {
        matches!(
            self,
            ProbeError::CaptureUnavailable { .. }
                | ProbeError::CaptureTimeout { .. }
                | ProbeError::AssetMissing { .. }
        )
    }

    pub fn capture_unavailable(reason: impl Into<String>) -> Self {
        ProbeError::CaptureUnavailable {
            reason: reason.into(),
        }
    }

    pub fn decode(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ProbeError::DecodeFailure {
            source_name: source_name.into(),
            description: err.to_string(),
        }
    }
}
