/// Template matching module for locating the anchor button in a screenshot
///
/// This module provides:
/// - Loading the button glyph with an explicit existence check
/// - Normalized correlation coefficient matching (zero-mean, all channels)
/// - Validation that the template fits inside the frame
pub mod matcher;
pub mod store;
pub mod types;

pub use matcher::{CoefficientMatcher, ImageMatcher, ensure_template_fits};
pub use store::TemplateStore;
pub use types::{MatchResult, Template};
