//! Operator-facing presentation of the annotated frame

use crate::capture::Frame;
use crate::error::{ProbeError, ProbeResult};
use minifb::{KeyRepeat, Scale, ScaleMode, Window, WindowOptions};

/// Shows a finished frame to the operator.
pub trait Presenter {
    /// Display `frame` and block until the operator dismisses it.
    fn present(&mut self, frame: &Frame, title: &str) -> ProbeResult<()>;
}

/// Presenter used with `--no-window`
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &Frame, _title: &str) -> ProbeResult<()> {
        log::debug!("Window disabled, skipping preview");
        Ok(())
    }
}

/// Native window that stays open until a key press or close request.
///
/// The window is owned by `present` and closed when it returns, on both the
/// success and the error path.
#[derive(Debug)]
pub struct WindowPresenter {
    pub target_fps: usize,
}

impl Default for WindowPresenter {
    fn default() -> Self {
        Self { target_fps: 30 }
    }
}

impl Presenter for WindowPresenter {
    fn present(&mut self, frame: &Frame, title: &str) -> ProbeResult<()> {
        let (width, height) = (frame.width() as usize, frame.height() as usize);
        let buffer = to_0rgb(frame);

        let options = WindowOptions {
            resize: true,
            // Phone screenshots are usually taller than the monitor
            scale: Scale::FitScreen,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width, height, options).map_err(|e| {
            ProbeError::Display {
                description: e.to_string(),
            }
        })?;
        window.set_target_fps(self.target_fps);

        println!("👀 Press any key in the preview window to exit");
        while window.is_open() && window.get_keys_pressed(KeyRepeat::No).is_empty() {
            window
                .update_with_buffer(&buffer, width, height)
                .map_err(|e| ProbeError::Display {
                    description: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// Pack RGB pixels as 0x00RRGGBB, the framebuffer layout minifb expects.
pub fn to_0rgb(frame: &Frame) -> Vec<u32> {
    frame
        .pixels()
        .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
        .collect()
}
