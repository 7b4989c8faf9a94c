//! Annotation and presentation of the probe result
//!
//! Draws the anchor, the matched button and the derived OCR region onto the
//! frame, then hands it to a presenter (window, file or nothing).

pub mod draw;
pub mod ocr_preview;
pub mod window;

pub use draw::annotate;
pub use ocr_preview::{ocr_preview, save_ocr_preview};
pub use window::{NullPresenter, Presenter, WindowPresenter};
