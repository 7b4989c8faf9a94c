//! Loading of the anchor template asset

use super::types::Template;
use crate::capture::ImageCodec;
use crate::error::{ProbeError, ProbeResult};
use std::path::Path;

/// Loads the button glyph from local storage.
pub struct TemplateStore<'a, C: ImageCodec> {
    codec: &'a C,
}

impl<'a, C: ImageCodec> TemplateStore<'a, C> {
    pub fn new(codec: &'a C) -> Self {
        Self { codec }
    }

    /// Load the template at `path`.
    ///
    /// A missing file is reported as [`ProbeError::AssetMissing`] before any
    /// decoding is attempted, so it is never confused with a corrupt file.
    pub fn load(&self, path: &Path) -> ProbeResult<Template> {
        if !path.is_file() {
            return Err(ProbeError::AssetMissing {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path)?;
        let source_name = format!("template {}", path.display());
        let pixels = self.codec.decode(&bytes, &source_name)?;
        let template = Template::new(path, pixels);

        log::debug!(
            "Loaded template '{}' ({}x{})",
            template.name,
            template.pixels.width(),
            template.pixels.height()
        );
        Ok(template)
    }
}
