use imgkit_image::{Image, ImageError};

use crate::color::{rgb_from_ycrcb, ycrcb_from_rgb};
use crate::config::{ContrastSpreadConfig, ContrastStretchConfig};
use crate::histogram::{compute_histogram, cumulative_histogram, NUM_BINS};
use crate::parallel;

/// Remap every value of a single channel image through a lookup table.
fn apply_lut(src: &Image<u8, 1>, lut: &[u8; NUM_BINS]) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    parallel::par_iter_rows_val(src, &mut dst, |&src_val, dst_val| {
        *dst_val = lut[src_val as usize];
    });
    Ok(dst)
}

fn min_max(src: &Image<u8, 1>) -> (u8, u8) {
    src.as_slice()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Equalize the histogram of a grayscale image.
///
/// Every value `v` is remapped to
///
/// `round((cdf(v) - cdf_min) * 255 / (N - cdf_min))`
///
/// where `cdf_min` is the count of the lowest occupied bin and `N` the number
/// of pixels. Halves round to even. An image with a single value is returned
/// unchanged.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::enhance::equalize_histogram;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 1 }, vec![10, 10, 20, 30]).unwrap();
/// let equalized = equalize_histogram(&image).unwrap();
/// assert_eq!(equalized.as_slice(), &[0, 0, 128, 255]);
/// ```
pub fn equalize_histogram(src: &Image<u8, 1>) -> Result<Image<u8, 1>, ImageError> {
    let hist = compute_histogram(src);
    let cdf = cumulative_histogram(&hist);
    let total = cdf[NUM_BINS - 1];

    let cdf_min = hist.iter().copied().find(|&h| h > 0).unwrap_or(0);
    if total == cdf_min {
        log::debug!("equalize_histogram: single valued image, returned unchanged");
        return Ok(src.clone());
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut lut = [0u8; NUM_BINS];
    for (l, &c) in lut.iter_mut().zip(cdf.iter()) {
        *l = (c.saturating_sub(cdf_min) as f64 * scale)
            .round_ties_even()
            .clamp(0.0, 255.0) as u8;
    }

    apply_lut(src, &lut)
}

/// Equalize the brightness of an RGB image.
///
/// The image is converted to YCrCb, only the luma channel is equalized with
/// [`equalize_histogram`] and the result is converted back, so hue is kept.
pub fn equalize_histogram_rgb(src: &Image<u8, 3>) -> Result<Image<u8, 3>, ImageError> {
    let ycrcb = ycrcb_from_rgb(src)?;
    let mut channels = ycrcb.split_channels()?;
    channels[0] = equalize_histogram(&channels[0])?;
    rgb_from_ycrcb(&Image::from_channels(&channels)?)
}

fn contrast_stretch_channel(
    src: &Image<u8, 1>,
    min_out: u8,
    max_out: u8,
) -> Result<Image<u8, 1>, ImageError> {
    let (lo, hi) = min_max(src);
    if lo == hi {
        return Ok(src.clone());
    }

    let (lo, hi) = (lo as f32, hi as f32);
    let (min_out, max_out) = (min_out as f32, max_out as f32);
    let mut lut = [0u8; NUM_BINS];
    for (v, l) in lut.iter_mut().enumerate() {
        let stretched = (v as f32 - lo) * (max_out - min_out) / (hi - lo) + min_out;
        *l = stretched.clamp(min_out, max_out) as u8;
    }

    apply_lut(src, &lut)
}

/// Linearly stretch every channel to `[min_out, max_out]`.
///
/// Each channel uses its own observed minimum and maximum:
///
/// `(v - min) * (max_out - min_out) / (max - min) + min_out`
///
/// clamped to the output range and truncated. A channel holding a single value
/// is returned unchanged.
///
/// # Errors
///
/// [`ImageError::InvalidOutputRange`] if `min_out >= max_out`.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::config::ContrastStretchConfig;
/// use imgkit_imgproc::enhance::contrast_stretch;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![50, 125, 200]).unwrap();
/// let stretched = contrast_stretch(&image, &ContrastStretchConfig::default()).unwrap();
/// assert_eq!(stretched.as_slice(), &[0, 127, 255]);
/// ```
pub fn contrast_stretch<const C: usize>(
    src: &Image<u8, C>,
    config: &ContrastStretchConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    src.map_channels(|ch| contrast_stretch_channel(ch, config.min_out, config.max_out))
}

/// Find the `[lo, hi]` value range that keeps all but `percentage` percent of
/// the pixels at each end of the histogram.
fn spread_bounds(hist: &[usize; NUM_BINS], percentage: f64) -> (usize, usize) {
    let cdf = cumulative_histogram(hist);
    let total = cdf[NUM_BINS - 1] as f64;
    let low_count = total * (percentage / 100.0);
    let high_count = total * (1.0 - percentage / 100.0);

    let lo = cdf.iter().position(|&c| c as f64 >= low_count).unwrap_or(0);
    let hi = cdf
        .iter()
        .rposition(|&c| c as f64 <= high_count)
        .unwrap_or(NUM_BINS - 1);

    (lo, hi)
}

fn contrast_spread_channel(src: &Image<u8, 1>, percentage: f64) -> Result<Image<u8, 1>, ImageError> {
    let (lo, hi) = spread_bounds(&compute_histogram(src), percentage);

    let mut lut = [0u8; NUM_BINS];
    if lo < hi {
        let (lo, hi) = (lo as f32, hi as f32);
        for (v, l) in lut.iter_mut().enumerate() {
            *l = ((v as f32 - lo) * 255.0 / (hi - lo)).clamp(0.0, 255.0) as u8;
        }
    } else {
        log::debug!("contrast_spread: empty range [{lo}, {hi}], channel set to zero");
    }

    apply_lut(src, &lut)
}

/// Spread the contrast of every channel after clipping the histogram tails.
///
/// Per channel, `lo` is the smallest value whose cumulative count reaches
/// `percentage` percent of the pixels, and `hi` the largest value whose
/// cumulative count stays within `100 - percentage` percent. The range
/// `[lo, hi]` is rescaled to `[0, 255]`. When `lo >= hi` the channel becomes all zero.
///
/// # Errors
///
/// [`ImageError::InvalidPercentage`] if the percentage is outside `[0, 50)`.
pub fn contrast_spread<const C: usize>(
    src: &Image<u8, C>,
    config: &ContrastSpreadConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    src.map_channels(|ch| contrast_spread_channel(ch, config.percentage))
}
