/// Template matching implementation
///
/// Normalized correlation coefficient (zero-mean normalized cross-correlation)
/// over all three colour channels. The expensive sum of products comes from
/// `imageproc`'s cross-correlation; window means and variances come from
/// integral images so every placement costs O(1) on top of that.
use super::types::{MatchResult, Template};
use crate::capture::Frame;
use crate::error::{ProbeError, ProbeResult};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};
use imageproc::template_matching::{MatchTemplateMethod, find_extremes, match_template_parallel};

/// Denominators below this are treated as flat (zero variance) content.
const FLAT_EPSILON: f64 = 1e-6;

type ScoreMap = ImageBuffer<Luma<f32>, Vec<f32>>;
type SumTable = ImageBuffer<Luma<u64>, Vec<u64>>;

/// Finds the single best placement of a template inside a frame.
pub trait ImageMatcher {
    fn find_best(&self, frame: &Frame, template: &Template) -> ProbeResult<MatchResult>;
}

/// Reject templates that are empty or do not fit inside the frame.
pub fn ensure_template_fits(frame: &Frame, template: &Frame) -> ProbeResult<()> {
    let (fw, fh) = frame.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > fw || th > fh {
        return Err(ProbeError::InvalidTemplateSize {
            template: (tw, th),
            frame: (fw, fh),
        });
    }
    Ok(())
}

/// TM_CCOEFF_NORMED style matcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoefficientMatcher;

/// Per-channel inputs to the coefficient formula
struct ChannelTables {
    cross: ScoreMap,
    sums: SumTable,
    squares: SumTable,
    template_sum: f64,
    template_sq_sum: f64,
}

impl CoefficientMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Score every placement of `template` fully inside `frame`.
    ///
    /// The returned map is `(fw - tw + 1) x (fh - th + 1)`. Placements where
    /// either the window or the template has no variance score 0.0.
    pub fn score_map(&self, frame: &Frame, template: &Frame) -> ProbeResult<ScoreMap> {
        ensure_template_fits(frame, template)?;

        let (tw, th) = template.dimensions();
        let result_w = frame.width() - tw + 1;
        let result_h = frame.height() - th + 1;
        let n = f64::from(tw) * f64::from(th);

        let channels: Vec<ChannelTables> = (0..3)
            .map(|c| {
                let frame_c = channel(frame, c);
                let template_c = channel(template, c);
                let (template_sum, template_sq_sum) = template_c.pixels().fold(
                    (0.0_f64, 0.0_f64),
                    |(s, sq), p| {
                        let v = f64::from(p[0]);
                        (s + v, sq + v * v)
                    },
                );
                ChannelTables {
                    cross: match_template_parallel(
                        &frame_c,
                        &template_c,
                        MatchTemplateMethod::CrossCorrelation,
                    ),
                    sums: integral_image::<_, u64>(&frame_c),
                    squares: integral_squared_image::<_, u64>(&frame_c),
                    template_sum,
                    template_sq_sum,
                }
            })
            .collect();

        let template_var: f64 = channels
            .iter()
            .map(|t| t.template_sq_sum - t.template_sum * t.template_sum / n)
            .sum();

        let scores = ScoreMap::from_fn(result_w, result_h, |x, y| {
            let mut numerator = 0.0_f64;
            let mut window_var = 0.0_f64;
            for t in &channels {
                let sum = window_sum(&t.sums, x, y, tw, th);
                let sq_sum = window_sum(&t.squares, x, y, tw, th);
                numerator += f64::from(t.cross.get_pixel(x, y)[0]) - t.template_sum * sum / n;
                window_var += sq_sum - sum * sum / n;
            }

            let denominator = (template_var * window_var).sqrt();
            if template_var <= FLAT_EPSILON || window_var <= FLAT_EPSILON || denominator <= FLAT_EPSILON
            {
                Luma([0.0])
            } else {
                Luma([(numerator / denominator).clamp(-1.0, 1.0) as f32])
            }
        });

        log::debug!(
            "Scored {}x{} placements for {}x{} template",
            result_w,
            result_h,
            tw,
            th
        );
        Ok(scores)
    }
}

impl ImageMatcher for CoefficientMatcher {
    fn find_best(&self, frame: &Frame, template: &Template) -> ProbeResult<MatchResult> {
        let start = std::time::Instant::now();
        let scores = self.score_map(frame, &template.pixels)?;

        // First maximum in row-major order wins ties
        let extremes = find_extremes(&scores);
        let (x, y) = extremes.max_value_location;
        let result = MatchResult::new(x as i32, y as i32, extremes.max_value.clamp(0.0, 1.0));

        log::debug!(
            "Best match {} in {}ms",
            result.describe(template),
            start.elapsed().as_millis()
        );
        Ok(result)
    }
}

/// Extract one colour channel as a grayscale image
fn channel(image: &Frame, c: usize) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[c]])
    })
}

/// Sum of the `w x h` window at `(x, y)` from a zero-padded integral image
fn window_sum(table: &SumTable, x: u32, y: u32, w: u32, h: u32) -> f64 {
    let a = table.get_pixel(x, y)[0];
    let b = table.get_pixel(x + w, y)[0];
    let c = table.get_pixel(x, y + h)[0];
    let d = table.get_pixel(x + w, y + h)[0];
    ((d + a) - (b + c)) as f64
}
