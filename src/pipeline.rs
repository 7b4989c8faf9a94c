//! The probe pipeline: capture -> load template -> match -> anchor -> annotate -> present.
//!
//! Every capability is injected so the pipeline runs against fakes in tests.

use crate::anchor::{AnchorRegion, TemplateSize, compute_anchor};
use crate::annotate::{Presenter, annotate, save_ocr_preview};
use crate::capture::{FrameProvider, ImageCodec, capture_frame};
use crate::config::{ProbeConfig, WINDOW_TITLE};
use crate::error::{ProbeError, ProbeResult};
use crate::template_matching::{ImageMatcher, MatchResult, TemplateStore};
use serde::Serialize;

/// Everything a run learned, for the console and `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub template_name: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub template_size: TemplateSize,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub anchor: AnchorRegion,
    pub low_confidence: bool,
}

/// Injected capabilities for one run
pub struct Probe<'a, F, C, M, P> {
    pub config: &'a ProbeConfig,
    pub frames: &'a F,
    pub codec: &'a C,
    pub matcher: &'a M,
    pub presenter: &'a mut P,
}

impl<F, C, M, P> Probe<'_, F, C, M, P>
where
    F: FrameProvider,
    C: ImageCodec,
    M: ImageMatcher,
    P: Presenter,
{
    pub async fn run(&mut self) -> ProbeResult<ProbeReport> {
        self.say(format!("📸 Capturing screen via {}...", self.frames.describe()));
        let mut frame = capture_frame(self.frames, self.codec).await?;

        // Checked after capture so an unplugged device is reported first
        let template = TemplateStore::new(self.codec).load(&self.config.template_path)?;
        let template_size = template.size();

        let match_result = self.matcher.find_best(&frame, &template)?;
        let low_confidence = !match_result.is_confident(self.config.confidence_threshold);
        if let Some(warning) =
            low_confidence_warning(match_result.confidence, self.config.confidence_threshold)
        {
            log::warn!("{warning} for '{}'", template.name);
            self.say(format!("⚠️ {warning}"));
        }
        self.say(format!("🎯 Match: {}", match_result.describe(&template)));

        let anchor = compute_anchor(match_result.top_left, template_size, &self.config.offsets);
        self.say(format!(
            "⚓ Anchor (Center): ({}, {})",
            anchor.center.x, anchor.center.y
        ));

        // Crop before drawing so the outlines do not leak into the preview
        if let Some(path) = &self.config.ocr_preview_path {
            if save_ocr_preview(&frame, &anchor, path)? {
                self.say(format!("🔤 OCR preview saved to {}", path.display()));
            } else {
                log::warn!("OCR region lies entirely outside the frame, no preview written");
                self.say("⚠️ OCR region is off-screen, preview skipped".to_string());
            }
        }

        annotate(&mut frame, &match_result, template_size, &anchor);
        self.say(format!(
            "🟥 Final OCR Box: x={}, y={}, w={}, h={} (bottom-right {}, {})",
            anchor.target_top_left.x,
            anchor.target_top_left.y,
            anchor.target_width(),
            anchor.target_height(),
            anchor.target_bottom_right.x,
            anchor.target_bottom_right.y
        ));

        if let Some(path) = &self.config.save_path {
            frame.save(path).map_err(|e| ProbeError::Output {
                path: path.clone(),
                description: e.to_string(),
            })?;
            self.say(format!("💾 Annotated frame saved to {}", path.display()));
        }

        self.presenter.present(&frame, WINDOW_TITLE)?;

        Ok(ProbeReport {
            template_name: template.name,
            frame_width: frame.width(),
            frame_height: frame.height(),
            template_size,
            match_result,
            anchor,
            low_confidence,
        })
    }

    // Human-readable progress goes to stderr when stdout carries JSON
    fn say(&self, line: String) {
        if self.config.json_report {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

/// Warning text for a match below the advisory threshold.
pub fn low_confidence_warning(confidence: f32, threshold: f32) -> Option<String> {
    (confidence < threshold).then(|| format!("Low confidence ({confidence:.2})"))
}

/// Process exit code for a finished run: operational absences exit cleanly.
pub fn exit_code(result: &ProbeResult<ProbeReport>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) if e.is_graceful() => 0,
        Err(_) => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStream {
    Stdout,
    Stderr,
}

/// Closing status line for a finished run.
///
/// `None` when the JSON report is the whole output. Under `--json` stdout
/// carries nothing but the report, so every status line goes to stderr.
pub fn status_line(
    result: &ProbeResult<ProbeReport>,
    json_report: bool,
) -> Option<(StatusStream, String)> {
    let human = if json_report {
        StatusStream::Stderr
    } else {
        StatusStream::Stdout
    };
    match result {
        Ok(_) if json_report => None,
        Ok(_) => Some((StatusStream::Stdout, "✅ Done".to_string())),
        Err(e) if e.is_graceful() => Some((human, format!("⚠️ {e}"))),
        Err(e) => Some((StatusStream::Stderr, format!("❌ {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Point;
    use crate::capture::{Frame, StandardCodec};
    use crate::config::OffsetConfig;
    use crate::template_matching::{CoefficientMatcher, Template};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::cell::Cell;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    struct FixedFrameProvider {
        bytes: Vec<u8>,
        calls: Cell<usize>,
    }

    impl FixedFrameProvider {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                calls: Cell::new(0),
            }
        }
    }

    impl FrameProvider for FixedFrameProvider {
        async fn capture_bytes(&self) -> ProbeResult<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.bytes.clone())
        }

        fn describe(&self) -> String {
            "fake-device".to_string()
        }
    }

    struct FixedMatcher {
        result: MatchResult,
        calls: Cell<usize>,
    }

    impl FixedMatcher {
        fn new(x: i32, y: i32, confidence: f32) -> Self {
            Self {
                result: MatchResult::new(x, y, confidence),
                calls: Cell::new(0),
            }
        }
    }

    impl ImageMatcher for FixedMatcher {
        fn find_best(&self, _frame: &Frame, _template: &Template) -> ProbeResult<MatchResult> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.result)
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        shown: Vec<(u32, u32, String)>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, frame: &Frame, title: &str) -> ProbeResult<()> {
            self.shown
                .push((frame.width(), frame.height(), title.to_string()));
            Ok(())
        }
    }

    fn png(image: &RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "adb-anchor-probe-pipeline-{}-{name}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_template(dir: &Path, image: &RgbImage) -> PathBuf {
        let path = dir.join("btn_send.png");
        image.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    fn config_with(template_path: PathBuf) -> ProbeConfig {
        ProbeConfig {
            template_path,
            show_window: false,
            ..ProbeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_reference_scenario_with_fixed_match() {
        let dir = scratch_dir("reference");
        let template_path = write_template(&dir, &RgbImage::from_pixel(80, 24, Rgb([1, 2, 3])));
        let config = config_with(template_path);
        let frames = FixedFrameProvider::new(png(&RgbImage::from_pixel(1080, 720, Rgb([9, 9, 9]))));
        let matcher = FixedMatcher::new(500, 300, 0.97);
        let mut presenter = RecordingPresenter::default();

        let result = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &matcher,
            presenter: &mut presenter,
        }
        .run()
        .await;

        let report = result.as_ref().unwrap();
        assert_eq!(report.anchor.center, Point::new(540, 312));
        assert_eq!(report.anchor.target_top_left, Point::new(500, 255));
        assert_eq!(report.anchor.target_bottom_right, Point::new(580, 279));
        assert!(!report.low_confidence);
        assert_eq!(report.template_name, "btn_send");
        assert_eq!(
            presenter.shown,
            vec![(1080, 720, WINDOW_TITLE.to_string())]
        );
        assert_eq!(exit_code(&result), 0);
    }

    #[tokio::test]
    async fn test_empty_capture_stops_before_matching() {
        let dir = scratch_dir("empty");
        let template_path = write_template(&dir, &RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])));
        let config = config_with(template_path);
        let frames = FixedFrameProvider::new(Vec::new());
        let matcher = FixedMatcher::new(0, 0, 1.0);
        let mut presenter = RecordingPresenter::default();

        let result = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &matcher,
            presenter: &mut presenter,
        }
        .run()
        .await;

        assert!(matches!(result, Err(ProbeError::CaptureUnavailable { .. })));
        assert_eq!(matcher.calls.get(), 0);
        assert!(presenter.shown.is_empty());
        assert_eq!(exit_code(&result), 0);
    }

    #[tokio::test]
    async fn test_missing_asset_after_capture() {
        let config = config_with(PathBuf::from("assets/not-here/btn_send.png"));
        let frames = FixedFrameProvider::new(png(&RgbImage::from_pixel(50, 50, Rgb([0, 0, 0]))));
        let matcher = FixedMatcher::new(0, 0, 1.0);
        let mut presenter = RecordingPresenter::default();

        let result = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &matcher,
            presenter: &mut presenter,
        }
        .run()
        .await;

        assert!(matches!(result, Err(ProbeError::AssetMissing { .. })));
        assert_eq!(frames.calls.get(), 1, "capture happens before the asset check");
        assert_eq!(matcher.calls.get(), 0);
        assert_eq!(exit_code(&result), 0);
    }

    #[tokio::test]
    async fn test_low_confidence_continues_to_display() {
        let dir = scratch_dir("low");
        let template_path = write_template(&dir, &RgbImage::from_pixel(20, 10, Rgb([1, 2, 3])));
        let config = config_with(template_path);
        let frames = FixedFrameProvider::new(png(&RgbImage::from_pixel(200, 100, Rgb([5, 5, 5]))));
        let matcher = FixedMatcher::new(30, 40, 0.42);
        let mut presenter = RecordingPresenter::default();

        let result = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &matcher,
            presenter: &mut presenter,
        }
        .run()
        .await;

        let report = result.as_ref().unwrap();
        assert!(report.low_confidence);
        assert_eq!(report.match_result.confidence, 0.42);
        assert_eq!(report.anchor.center, Point::new(40, 45));
        assert_eq!(presenter.shown.len(), 1);
        assert_eq!(exit_code(&result), 0);
    }

    #[tokio::test]
    async fn test_oversized_template_is_a_failure() {
        let dir = scratch_dir("oversized");
        let template_path = write_template(&dir, &RgbImage::from_pixel(60, 10, Rgb([1, 2, 3])));
        let config = config_with(template_path);
        let frames = FixedFrameProvider::new(png(&RgbImage::from_pixel(40, 40, Rgb([5, 5, 5]))));
        let mut presenter = RecordingPresenter::default();

        let result = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &CoefficientMatcher::new(),
            presenter: &mut presenter,
        }
        .run()
        .await;

        assert!(matches!(result, Err(ProbeError::InvalidTemplateSize { .. })));
        assert!(presenter.shown.is_empty());
        assert_eq!(exit_code(&result), 1);
    }

    #[tokio::test]
    async fn test_corrupt_capture_is_a_failure() {
        let dir = scratch_dir("corrupt");
        let template_path = write_template(&dir, &RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])));
        let config = config_with(template_path);
        let frames = FixedFrameProvider::new(b"garbage".to_vec());
        let mut presenter = RecordingPresenter::default();

        let result = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &CoefficientMatcher::new(),
            presenter: &mut presenter,
        }
        .run()
        .await;

        assert!(matches!(result, Err(ProbeError::DecodeFailure { .. })));
        assert_eq!(exit_code(&result), 1);
    }

    #[tokio::test]
    async fn test_real_matcher_and_outputs() {
        let dir = scratch_dir("outputs");
        let frame = RgbImage::from_fn(160, 120, |x, y| {
            let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
            h ^= h >> 15;
            h = h.wrapping_mul(0x2C1B_3C6D);
            h ^= h >> 12;
            Rgb([h as u8, (h >> 8) as u8, (h >> 16) as u8])
        });
        let button = image::imageops::crop_imm(&frame, 90, 70, 30, 12).to_image();
        let template_path = write_template(&dir, &button);
        let save_path = dir.join("annotated.png");
        let preview_path = dir.join("ocr.png");
        let config = ProbeConfig {
            offsets: OffsetConfig {
                offset_x: -15,
                offset_y: -40,
                box_width: 30,
                box_height: 12,
            },
            save_path: Some(save_path.clone()),
            ocr_preview_path: Some(preview_path.clone()),
            json_report: true,
            ..config_with(template_path)
        };
        let frames = FixedFrameProvider::new(png(&frame));
        let mut presenter = RecordingPresenter::default();

        let report = Probe {
            config: &config,
            frames: &frames,
            codec: &StandardCodec,
            matcher: &CoefficientMatcher::new(),
            presenter: &mut presenter,
        }
        .run()
        .await
        .unwrap();

        assert_eq!(report.match_result.top_left, Point::new(90, 70));
        assert!(report.match_result.confidence > 0.99);
        assert_eq!(report.anchor.center, Point::new(105, 76));
        assert_eq!(report.anchor.target_top_left, Point::new(90, 36));
        assert!(save_path.is_file());
        assert!(preview_path.is_file());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["anchor"]["center"]["x"], 105);
        assert_eq!(json["match"]["top_left"]["y"], 70);
    }

    #[test]
    fn test_low_confidence_warning_text() {
        assert_eq!(
            low_confidence_warning(0.42, 0.8).as_deref(),
            Some("Low confidence (0.42)")
        );
        assert!(low_confidence_warning(0.8, 0.8).is_none());
        assert!(low_confidence_warning(0.95, 0.8).is_none());
    }

    #[test]
    fn test_graceful_status_stays_off_stdout_in_json_mode() {
        let result: ProbeResult<ProbeReport> = Err(ProbeError::capture_unavailable("no device"));

        let (stream, line) = status_line(&result, true).unwrap();
        assert_eq!(stream, StatusStream::Stderr);
        assert!(line.starts_with("⚠️"), "{line}");

        let (stream, _) = status_line(&result, false).unwrap();
        assert_eq!(stream, StatusStream::Stdout);
    }

    #[test]
    fn test_failure_status_always_goes_to_stderr() {
        let err: ProbeResult<ProbeReport> = Err(ProbeError::decode("btn_send.png", "bad header"));
        for json_report in [false, true] {
            let (stream, line) = status_line(&err, json_report).unwrap();
            assert_eq!(stream, StatusStream::Stderr);
            assert!(line.starts_with("❌"), "{line}");
        }
    }
}
