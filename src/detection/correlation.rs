//! Normalized correlation coefficient (OpenCV's `TM_CCOEFF_NORMED`) over RGB images.
//!
//! Each channel is mean-subtracted independently, products are summed across all
//! three channels, and the result is divided by the product of the template and
//! window norms. Window norms come from per-channel integral images. The numerator
//! is computed directly for small regions and through FFT cross-correlation
//! (Lewis, "Fast Normalized Cross-Correlation") once the direct cost gets large,
//! which is what keeps full-scan markers within a tick.

use image::RgbImage;
use rustfft::{num_complex::Complex, FftPlanner};

use super::region::SearchRegion;

const CHANNELS: usize = 3;
const EPSILON: f64 = 1e-7;
/// Multiply-adds above which the numerator switches to the FFT path.
const DIRECT_COST_LIMIT: u64 = 1 << 21;

/// Highest-scoring placement of a template inside a region, in region-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPeak {
    pub x: u32,
    pub y: u32,
    pub score: f64,
}

/// Scans every placement of `template` fully inside `region` and returns the global
/// maximum. Ties keep the first placement in row-major order. Returns `None` when the
/// template does not fit in the region.
pub fn best_match(
    haystack: &RgbImage,
    region: SearchRegion,
    template: &RgbImage,
) -> Option<CorrelationPeak> {
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > region.width || th > region.height {
        return None;
    }

    let centered = CenteredTemplate::new(template);
    let window = WindowSums::new(haystack, region);
    let n = (tw * th) as f64;
    let cols = region.width - tw + 1;
    let rows = region.height - th + 1;

    let cost = cols as u64 * rows as u64 * (tw as u64 * th as u64);
    let numerators = if cost <= DIRECT_COST_LIMIT {
        direct_numerators(haystack, region, &centered)
    } else {
        fft_numerators(haystack, region, &centered)
    };

    let mut best: Option<CorrelationPeak> = None;
    for y in 0..rows {
        for x in 0..cols {
            let numerator = numerators[(y * cols + x) as usize];
            let window_norm = window.centered_norm(x, y, tw, th, n);
            let score = normalize(numerator, centered.norm, window_norm);

            if best.map_or(true, |peak| score > peak.score) {
                best = Some(CorrelationPeak { x, y, score });
            }
        }
    }
    best
}

/// Numerator for every placement, row-major with `region.width - tw + 1` columns.
fn direct_numerators(
    haystack: &RgbImage,
    region: SearchRegion,
    template: &CenteredTemplate,
) -> Vec<f64> {
    let (tw, th) = (template.width, template.height);
    let stride = haystack.width() as usize * CHANNELS;
    let raw = haystack.as_raw();
    let row_len = tw as usize * CHANNELS;

    let mut numerators = Vec::with_capacity(
        (region.width - tw + 1) as usize * (region.height - th + 1) as usize,
    );
    for y in 0..=(region.height - th) {
        for x in 0..=(region.width - tw) {
            let mut numerator = 0.0;
            for ty in 0..th as usize {
                let start = (region.y as usize + y as usize + ty) * stride
                    + (region.x as usize + x as usize) * CHANNELS;
                let pixels = &raw[start..start + row_len];
                let weights = &template.values[ty * row_len..(ty + 1) * row_len];
                numerator += pixels
                    .iter()
                    .zip(weights)
                    .map(|(&p, &w)| p as f64 * w)
                    .sum::<f64>();
            }
            numerators.push(numerator);
        }
    }
    numerators
}

/// Same result as [`direct_numerators`] via the cross-correlation theorem.
///
/// The region is flattened row-major with its own width as stride, so every valid
/// placement lands at `y * width + x` without wrap-around. Red and green travel
/// together as the real and imaginary parts of one transform: the real part of
/// `(r + ig) * conj(tr + itg)` is `r*tr + g*tg`.
fn fft_numerators(
    haystack: &RgbImage,
    region: SearchRegion,
    template: &CenteredTemplate,
) -> Vec<f64> {
    let stride = region.width as usize;
    let len = (stride * region.height as usize).next_power_of_two();
    let zero = Complex::new(0.0, 0.0);

    // Offsetting the image does not change the result (the template is zero-mean)
    // but keeps the transforms' magnitudes, and so their rounding error, small.
    let mut image_rg = vec![zero; len];
    let mut image_b = vec![zero; len];
    for y in 0..region.height {
        for x in 0..region.width {
            let p = haystack.get_pixel(region.x + x, region.y + y).0;
            let at = y as usize * stride + x as usize;
            image_rg[at] = Complex::new(p[0] as f64 - 128.0, p[1] as f64 - 128.0);
            image_b[at] = Complex::new(p[2] as f64 - 128.0, 0.0);
        }
    }

    let mut template_rg = vec![zero; len];
    let mut template_b = vec![zero; len];
    for ty in 0..template.height as usize {
        for tx in 0..template.width as usize {
            let base = (ty * template.width as usize + tx) * CHANNELS;
            let v = &template.values[base..base + CHANNELS];
            let at = ty * stride + tx;
            template_rg[at] = Complex::new(v[0], v[1]);
            template_b[at] = Complex::new(v[2], 0.0);
        }
    }

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(len);
    for buffer in [
        &mut image_rg,
        &mut image_b,
        &mut template_rg,
        &mut template_b,
    ] {
        forward.process(buffer);
    }

    let mut spectrum: Vec<Complex<f64>> = image_rg
        .iter()
        .zip(&template_rg)
        .zip(image_b.iter().zip(&template_b))
        .map(|((rg, t_rg), (b, t_b))| rg * t_rg.conj() + b * t_b.conj())
        .collect();
    planner.plan_fft_inverse(len).process(&mut spectrum);

    let scale = len as f64;
    let cols = (region.width - template.width + 1) as usize;
    let rows = (region.height - template.height + 1) as usize;
    let mut numerators = Vec::with_capacity(cols * rows);
    for y in 0..rows {
        for x in 0..cols {
            numerators.push(spectrum[y * stride + x].re / scale);
        }
    }
    numerators
}

fn normalize(numerator: f64, template_norm: f64, window_norm: f64) -> f64 {
    let denominator = (template_norm * window_norm).sqrt();
    if denominator <= EPSILON {
        return 0.0;
    }
    (numerator / denominator).clamp(-1.0, 1.0)
}

/// Template values with the per-channel mean removed, and their sum of squares.
struct CenteredTemplate {
    width: u32,
    height: u32,
    values: Vec<f64>,
    norm: f64,
}

impl CenteredTemplate {
    fn new(template: &RgbImage) -> Self {
        let raw = template.as_raw();
        let pixels = (raw.len() / CHANNELS) as f64;

        let mut means = [0.0f64; CHANNELS];
        for chunk in raw.chunks_exact(CHANNELS) {
            for (mean, &value) in means.iter_mut().zip(chunk) {
                *mean += value as f64;
            }
        }
        for mean in &mut means {
            *mean /= pixels;
        }

        let values: Vec<f64> = raw
            .iter()
            .enumerate()
            .map(|(i, &value)| value as f64 - means[i % CHANNELS])
            .collect();
        let norm = values.iter().map(|v| v * v).sum();

        Self {
            width: template.width(),
            height: template.height(),
            values,
            norm,
        }
    }
}

/// Per-channel summed-area tables of values and squared values over a region.
struct WindowSums {
    stride: usize,
    sum: [Vec<f64>; CHANNELS],
    sq_sum: [Vec<f64>; CHANNELS],
}

impl WindowSums {
    fn new(image: &RgbImage, region: SearchRegion) -> Self {
        let stride = region.width as usize + 1;
        let len = stride * (region.height as usize + 1);
        let mut sum: [Vec<f64>; CHANNELS] = std::array::from_fn(|_| vec![0.0; len]);
        let mut sq_sum: [Vec<f64>; CHANNELS] = std::array::from_fn(|_| vec![0.0; len]);

        for y in 0..region.height {
            let mut row_sum = [0.0f64; CHANNELS];
            let mut row_sq = [0.0f64; CHANNELS];
            for x in 0..region.width {
                let pixel = image.get_pixel(region.x + x, region.y + y);
                let at = (y as usize + 1) * stride + x as usize + 1;
                let above = y as usize * stride + x as usize + 1;
                for c in 0..CHANNELS {
                    let value = pixel.0[c] as f64;
                    row_sum[c] += value;
                    row_sq[c] += value * value;
                    sum[c][at] = sum[c][above] + row_sum[c];
                    sq_sum[c][at] = sq_sum[c][above] + row_sq[c];
                }
            }
        }

        Self {
            stride,
            sum,
            sq_sum,
        }
    }

    fn rect(&self, table: &[f64], x: u32, y: u32, w: u32, h: u32) -> f64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        table[y1 * self.stride + x1] - table[y0 * self.stride + x1] - table[y1 * self.stride + x0]
            + table[y0 * self.stride + x0]
    }

    /// Sum over channels of the window's squared deviations from its channel means.
    fn centered_norm(&self, x: u32, y: u32, w: u32, h: u32, n: f64) -> f64 {
        (0..CHANNELS)
            .map(|c| {
                let s = self.rect(&self.sum[c], x, y, w, h);
                let sq = self.rect(&self.sq_sum[c], x, y, w, h);
                (sq - s * s / n).max(0.0)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn pattern(width: u32, height: u32, seed: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (x * 37 + y * 91 + seed * 13) % 251;
            Rgb([v as u8, (v * 3 % 256) as u8, (255 - v) as u8])
        })
    }

    fn paste(target: &mut RgbImage, patch: &RgbImage, at_x: u32, at_y: u32) {
        for (x, y, pixel) in patch.enumerate_pixels() {
            target.put_pixel(at_x + x, at_y + y, *pixel);
        }
    }

    #[test]
    fn exact_copy_scores_one_at_its_location() {
        let mut haystack = RgbImage::from_pixel(40, 30, Rgb([20, 20, 20]));
        let template = pattern(6, 5, 1);
        paste(&mut haystack, &template, 17, 9);

        let peak = best_match(&haystack, SearchRegion::full_image(40, 30), &template)
            .expect("template fits");
        assert_eq!((peak.x, peak.y), (17, 9));
        assert!((peak.score - 1.0).abs() < 1e-9, "score {}", peak.score);
    }

    #[test]
    fn peak_is_reported_relative_to_region() {
        let mut haystack = RgbImage::from_pixel(40, 30, Rgb([0, 0, 0]));
        let template = pattern(4, 4, 2);
        paste(&mut haystack, &template, 25, 12);

        let region = SearchRegion::new(20, 10, 15, 10);
        let peak = best_match(&haystack, region, &template).expect("template fits");
        assert_eq!((peak.x, peak.y), (5, 2));
    }

    #[test]
    fn affine_brightness_change_still_scores_one() {
        let template = pattern(5, 5, 3);
        let brighter = RgbImage::from_fn(5, 5, |x, y| {
            let p = template.get_pixel(x, y).0;
            Rgb([p[0] / 2 + 10, p[1] / 2 + 10, p[2] / 2 + 10])
        });
        let peak = best_match(&brighter, SearchRegion::full_image(5, 5), &template)
            .expect("template fits");
        assert!(peak.score > 0.99, "score {}", peak.score);
    }

    #[test]
    fn flat_window_scores_zero() {
        let haystack = RgbImage::from_pixel(10, 10, Rgb([128, 128, 128]));
        let template = pattern(3, 3, 4);
        let peak = best_match(&haystack, SearchRegion::full_image(10, 10), &template)
            .expect("template fits");
        assert_eq!(peak.score, 0.0);
        assert_eq!((peak.x, peak.y), (0, 0));
    }

    #[test]
    fn transform_numerators_agree_with_direct_sums() {
        let haystack = pattern(70, 45, 6);
        let template = pattern(9, 7, 8);
        let centered = CenteredTemplate::new(&template);
        let region = SearchRegion::new(3, 4, 60, 38);

        let direct = direct_numerators(&haystack, region, &centered);
        let transformed = fft_numerators(&haystack, region, &centered);
        assert_eq!(direct.len(), transformed.len());
        for (d, t) in direct.iter().zip(&transformed) {
            assert!((d - t).abs() < 1e-6 * d.abs().max(1.0), "{d} vs {t}");
        }
    }

    #[test]
    fn large_full_frame_search_finds_exact_copy() {
        let mut haystack = RgbImage::from_fn(400, 260, |x, y| {
            let v = ((x / 5) * 7 + (y / 3) * 11) % 97;
            Rgb([v as u8, (v * 2) as u8, 90])
        });
        let template = pattern(48, 30, 9);
        paste(&mut haystack, &template, 301, 187);

        let peak = best_match(&haystack, SearchRegion::full_image(400, 260), &template)
            .expect("template fits");
        assert_eq!((peak.x, peak.y), (301, 187));
        assert!((peak.score - 1.0).abs() < 1e-6, "score {}", peak.score);
    }

    #[test]
    fn template_larger_than_region_has_no_placement() {
        let haystack = pattern(20, 20, 5);
        let template = pattern(8, 8, 5);
        assert!(best_match(&haystack, SearchRegion::new(0, 0, 7, 20), &template).is_none());
    }
}
