//! Dominant-color extraction: k-means clustering over RGBA pixels.
//!
//! Seeding is k-means++ (first centroid uniformly at random, each next one
//! drawn with probability proportional to the squared distance from the
//! nearest centroid so far). Lloyd iterations then assign every pixel to
//! its nearest centroid and move each centroid to the rounded mean of its
//! pixels, until no centroid moves more than `tolerance` or the iteration
//! cap is hit.
//!
//! A cluster that loses all its pixels keeps its previous centroid. Such
//! clusters are left out of the result.

use n_color::Rgb;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Upper bound on requested clusters.
pub const MAX_COLOR_COUNT: usize = 20;

/// Pixels with alpha below this are transparent.
const ALPHA_THRESHOLD: u8 = 128;

type Pixel = [f64; 3];

/// Extraction knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractOptions {
    /// Clusters to find, 1..=20.
    pub color_count: usize,
    pub max_iterations: usize,
    /// Convergence threshold on centroid movement (RGB units).
    pub tolerance: f64,
    /// Ignore pixels with alpha below 128.
    pub skip_transparent: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            color_count: 5,
            max_iterations: 50,
            tolerance: 0.01,
            skip_transparent: true,
        }
    }
}

impl ExtractOptions {
    /// Set the cluster count, clamped to [1, 20].
    #[must_use]
    pub fn with_color_count(mut self, count: usize) -> Self {
        self.color_count = count.clamp(1, MAX_COLOR_COUNT);
        self
    }

    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub const fn with_skip_transparent(mut self, skip: bool) -> Self {
        self.skip_transparent = skip;
        self
    }
}

/// One extracted color and its share of the image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantColor {
    pub color: [u8; 3],
    pub hex: String,
    /// Pixels assigned to this color.
    pub count: usize,
    /// `count` over all considered pixels, in percent, two decimals.
    pub percentage: f64,
}

/// k-means extractor over a flat RGBA buffer (4 bytes per pixel, row-major).
#[derive(Debug, Clone, Copy)]
pub struct DominantColors<'a> {
    rgba: &'a [u8],
    width: u32,
    height: u32,
    options: ExtractOptions,
}

impl<'a> DominantColors<'a> {
    /// Wrap a `width` × `height` RGBA buffer.
    ///
    /// # Errors
    ///
    /// [`Error::BufferSize`] when `rgba` is not exactly `width * height * 4`
    /// bytes long.
    pub fn new(rgba: &'a [u8], width: u32, height: u32, options: ExtractOptions) -> Result<Self> {
        let expected = usize::try_from(u64::from(width) * u64::from(height) * 4).ok();
        if expected != Some(rgba.len()) {
            return Err(Error::BufferSize {
                width,
                height,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            rgba,
            width,
            height,
            options,
        })
    }

    /// `(width, height)` in pixels.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Extract with the thread-local RNG.
    #[must_use]
    pub fn extract(&self) -> Vec<DominantColor> {
        self.extract_with_rng(&mut rand::rng())
    }

    /// Extract, drawing seeds from `rng`. Sorted by share, largest first.
    #[must_use]
    pub fn extract_with_rng<R: Rng>(&self, rng: &mut R) -> Vec<DominantColor> {
        let pixels = self.pixels();
        if pixels.is_empty() {
            return Vec::new();
        }

        let k = self.options.color_count.clamp(1, MAX_COLOR_COUNT);
        let centroids = self.kmeans(&pixels, k, rng);

        let mut counts = vec![0usize; centroids.len()];
        for pixel in &pixels {
            counts[closest(pixel, &centroids)] += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let total = pixels.len() as f64;
        let mut results: Vec<DominantColor> = centroids
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(centroid, count)| {
                let rgb = Rgb::new(centroid[0], centroid[1], centroid[2]);
                #[allow(clippy::cast_precision_loss)]
                let share = count as f64 / total * 100.0;
                DominantColor {
                    color: rgb.to_rgb8(),
                    hex: rgb.to_hex(),
                    count,
                    percentage: (share * 100.0).round() / 100.0,
                }
            })
            .collect();

        results.sort_by(|a, b| b.count.cmp(&a.count));
        results
    }

    fn pixels(&self) -> Vec<Pixel> {
        self.rgba
            .chunks_exact(4)
            .filter(|px| !self.options.skip_transparent || px[3] >= ALPHA_THRESHOLD)
            .map(|px| [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])])
            .collect()
    }

    fn kmeans<R: Rng>(&self, pixels: &[Pixel], k: usize, rng: &mut R) -> Vec<Pixel> {
        let mut centroids = seed_centroids(pixels, k, rng);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.options.max_iterations && !converged {
            let mut sums = vec![[0.0; 3]; centroids.len()];
            let mut sizes = vec![0usize; centroids.len()];
            for pixel in pixels {
                let i = closest(pixel, &centroids);
                for (sum, channel) in sums[i].iter_mut().zip(pixel) {
                    *sum += channel;
                }
                sizes[i] += 1;
            }

            let next: Vec<Pixel> = centroids
                .iter()
                .zip(sums.iter().zip(&sizes))
                .map(|(prev, (sum, &size))| {
                    if size == 0 {
                        *prev
                    } else {
                        #[allow(clippy::cast_precision_loss)]
                        let n = size as f64;
                        [
                            (sum[0] / n).round(),
                            (sum[1] / n).round(),
                            (sum[2] / n).round(),
                        ]
                    }
                })
                .collect();

            converged = next
                .iter()
                .zip(&centroids)
                .all(|(a, b)| distance(a, b) < self.options.tolerance);
            centroids = next;
            iterations += 1;
        }

        debug!(
            pixels = pixels.len(),
            k, iterations, converged, "k-means finished"
        );
        centroids
    }
}

/// k-means++ seeding.
fn seed_centroids<R: Rng>(pixels: &[Pixel], k: usize, rng: &mut R) -> Vec<Pixel> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(pixels[rng.random_range(0..pixels.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = pixels
            .iter()
            .map(|p| {
                let d = centroids
                    .iter()
                    .map(|c| distance(p, c))
                    .fold(f64::INFINITY, f64::min);
                d * d
            })
            .collect();

        let threshold = rng.random::<f64>() * weights.iter().sum::<f64>();
        let mut cumulative = 0.0;
        let pick = weights
            .iter()
            .position(|w| {
                cumulative += w;
                cumulative >= threshold
            })
            .unwrap_or(pixels.len() - 1);
        centroids.push(pixels[pick]);
    }

    centroids
}

/// Index of the nearest centroid; ties go to the lowest index.
fn closest(pixel: &Pixel, centroids: &[Pixel]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = distance(pixel, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn distance(a: &Pixel, b: &Pixel) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

/// A decoded image: tightly packed RGBA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Extractor over this image's pixels.
    #[must_use]
    pub const fn extractor(&self, options: ExtractOptions) -> DominantColors<'_> {
        DominantColors {
            rgba: self.rgba.as_slice(),
            width: self.width,
            height: self.height,
            options,
        }
    }
}

/// Decode an encoded image (PNG, JPEG, …) into RGBA pixels.
///
/// # Errors
///
/// [`Error::Decode`] when the bytes are not a supported image.
#[cfg(feature = "decode")]
pub fn decode_rgba(bytes: &[u8]) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| Error::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    debug!(width, height, "decoded image");
    Ok(DecodedImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Decode an encoded image into RGBA pixels.
///
/// # Errors
///
/// Always [`Error::DecoderUnavailable`]: this build has no image decoder.
#[cfg(not(feature = "decode"))]
pub fn decode_rgba(bytes: &[u8]) -> Result<DecodedImage> {
    let _ = bytes;
    Err(Error::DecoderUnavailable)
}

/// Decode an encoded image and extract its dominant colors.
///
/// # Errors
///
/// Whatever [`decode_rgba`] fails with.
pub fn extract_from_encoded(bytes: &[u8], options: ExtractOptions) -> Result<Vec<DominantColor>> {
    Ok(decode_rgba(bytes)?.extractor(options).extract())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn solid(rgba: [u8; 4], n: usize) -> Vec<u8> {
        rgba.iter().copied().cycle().take(n * 4).collect()
    }

    /// Treat `buf` as a single row of pixels.
    fn run(buf: &[u8], options: ExtractOptions) -> Vec<DominantColor> {
        let width = u32::try_from(buf.len() / 4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        DominantColors::new(buf, width, 1, options)
            .unwrap()
            .extract_with_rng(&mut rng)
    }

    // ── Degenerate input ────────────────────────────────────────────

    #[test]
    fn empty_buffer_is_empty() {
        assert!(run(&[], ExtractOptions::default()).is_empty());
    }

    #[test]
    fn single_color_is_one_cluster() {
        let buf = solid([200, 40, 90, 255], 64);
        let result = run(&buf, ExtractOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].color, [200, 40, 90]);
        assert_eq!(result[0].hex, "#c8285a");
        assert_eq!(result[0].count, 64);
        assert!((result[0].percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn transparent_pixels_skipped() {
        let buf = solid([10, 10, 10, 0], 16);
        assert!(run(&buf, ExtractOptions::default()).is_empty());

        let kept = run(&buf, ExtractOptions::default().with_skip_transparent(false));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].count, 16);
    }

    #[test]
    fn buffer_must_match_dimensions() {
        let mut buf = solid([1, 2, 3, 255], 4);
        assert!(DominantColors::new(&buf, 2, 2, ExtractOptions::default()).is_ok());

        buf.extend_from_slice(&[9, 9]);
        let err = DominantColors::new(&buf, 2, 2, ExtractOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize { width: 2, height: 2, actual: 18 }
        ));
        assert!(DominantColors::new(&buf[..12], 2, 2, ExtractOptions::default()).is_err());
    }

    #[test]
    fn rows_are_all_considered() {
        let mut buf = solid([250, 10, 10, 255], 6);
        buf.extend(solid([10, 250, 10, 255], 6));
        let extractor = DominantColors::new(&buf, 3, 4, ExtractOptions::default().with_color_count(2))
            .unwrap();
        assert_eq!(extractor.dimensions(), (3, 4));
        let result = extractor.extract_with_rng(&mut StdRng::seed_from_u64(1));
        assert_eq!(result.iter().map(|c| c.count).sum::<usize>(), 12);
        assert_eq!(result.len(), 2);
    }

    // ── Clustering ──────────────────────────────────────────────────

    #[test]
    fn two_colors_split_by_share() {
        let mut buf = solid([250, 10, 10, 255], 75);
        buf.extend(solid([10, 10, 250, 255], 25));
        let result = run(&buf, ExtractOptions::default().with_color_count(2));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].color, [250, 10, 10]);
        assert!((result[0].percentage - 75.0).abs() < f64::EPSILON);
        assert_eq!(result[1].color, [10, 10, 250]);
        assert!((result[1].percentage - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counts_cover_every_pixel_and_sorted() {
        let mut buf = Vec::new();
        for i in 0..200u8 {
            buf.extend_from_slice(&[i, 255 - i, i / 2, 255]);
        }
        let result = run(&buf, ExtractOptions::default().with_color_count(4));
        assert!(!result.is_empty() && result.len() <= 4);
        assert_eq!(result.iter().map(|c| c.count).sum::<usize>(), 200);
        assert!(result.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn iteration_cap_terminates() {
        let mut buf = Vec::new();
        for i in 0..=255u8 {
            buf.extend_from_slice(&[i, i, i, 255]);
        }
        let options = ExtractOptions::default()
            .with_max_iterations(1)
            .with_tolerance(0.0);
        let result = run(&buf, options);
        assert_eq!(result.iter().map(|c| c.count).sum::<usize>(), 256);
    }

    #[test]
    fn color_count_clamped() {
        assert_eq!(ExtractOptions::default().with_color_count(0).color_count, 1);
        assert_eq!(ExtractOptions::default().with_color_count(99).color_count, 20);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ExtractOptions = serde_json::from_str(r#"{"colorCount": 3}"#).unwrap();
        assert_eq!(options.color_count, 3);
        assert_eq!(options.max_iterations, 50);
        assert!(options.skip_transparent);
    }

    // ── Decoding ────────────────────────────────────────────────────

    #[cfg(not(feature = "decode"))]
    #[test]
    fn decode_unavailable_without_feature() {
        let err = extract_from_encoded(&[0x89, b'P'], ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DecoderUnavailable));
    }

    #[cfg(feature = "decode")]
    #[test]
    fn decode_rejects_garbage() {
        let err = extract_from_encoded(b"not an image", ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[cfg(feature = "decode")]
    #[test]
    fn decode_png() {
        use std::io::Cursor;

        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([12, 34, 56, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let result = extract_from_encoded(&bytes, ExtractOptions::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].color, [12, 34, 56]);
        assert_eq!(result[0].count, 6);
    }
}
