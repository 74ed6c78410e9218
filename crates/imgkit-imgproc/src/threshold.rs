use num_traits::Zero;
use std::cmp::PartialOrd;

use imgkit_image::{Image, ImageError};

use crate::color::GrayConvert;
use crate::config::{AdaptiveThresholdConfig, LocalThresholdConfig};
use crate::histogram::{compute_histogram, NUM_BINS};
use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use crate::parallel;

/// Value of a foreground pixel in a binary image.
pub const FOREGROUND: u8 = 255;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

fn binarize(gray: &Image<u8, 1>, threshold: u8) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    threshold_binary(gray, &mut dst, threshold, FOREGROUND)?;
    Ok(dst)
}

/// Threshold an image with a fixed value.
///
/// Color input is converted to gray first. A pixel becomes 255 when it is
/// strictly greater than `threshold` and 0 otherwise.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::threshold::manual_threshold;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![127, 128, 0]).unwrap();
/// let binary = manual_threshold(&image, 127).unwrap();
/// assert_eq!(binary.as_slice(), &[0, 255, 0]);
/// ```
pub fn manual_threshold<I: GrayConvert>(src: &I, threshold: u8) -> Result<Image<u8, 1>, ImageError> {
    binarize(&src.to_gray()?, threshold)
}

/// Compute the threshold that maximizes the between-class variance of a histogram.
///
/// When several consecutive thresholds reach the same maximum variance, which
/// happens whenever the bins between two populations are empty, the middle
/// of that run is returned. Every threshold of the run splits the pixels
/// the same way.
///
/// Returns 0 for a histogram with a single occupied bin.
pub fn otsu_threshold_value(hist: &[usize; NUM_BINS]) -> u8 {
    let total_pixels = hist.iter().sum::<usize>() as f64;
    let sum_total = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum::<f64>();

    let mut best_variance = 0.0;
    let mut best_range: Option<(usize, usize)> = None;

    // initialize accumulators
    let mut weight_back = 0.0;
    let mut sum_back = 0.0;

    for (current_threshold, &hist_count) in hist.iter().enumerate() {
        weight_back += hist_count as f64;
        sum_back += current_threshold as f64 * hist_count as f64;

        // skip empty classes
        if weight_back == 0.0 || weight_back == total_pixels {
            continue;
        }

        let mean_back = sum_back / weight_back;
        let weight_fore = total_pixels - weight_back;
        let mean_fore = (sum_total - sum_back) / weight_fore;

        let variance = weight_back * weight_fore * (mean_back - mean_fore).powi(2);

        match best_range {
            Some((_, last)) if variance == best_variance && last + 1 == current_threshold => {
                best_range = best_range.map(|(first, _)| (first, current_threshold));
            }
            _ if variance > best_variance => {
                best_variance = variance;
                best_range = Some((current_threshold, current_threshold));
            }
            _ => {}
        }
    }

    best_range.map_or(0, |(first, last)| ((first + last) / 2) as u8)
}

/// Threshold an image with the Otsu method.
///
/// Color input is converted to gray first, the threshold is chosen with
/// [`otsu_threshold_value`] and pixels strictly above it become 255.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::threshold::otsu_threshold;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 2, height: 3 },
///     vec![100, 200, 50, 150, 200, 250],
/// ).unwrap();
///
/// let binary = otsu_threshold(&image).unwrap();
/// assert_eq!(binary.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn otsu_threshold<I: GrayConvert>(src: &I) -> Result<Image<u8, 1>, ImageError> {
    let gray = src.to_gray()?;
    let threshold = otsu_threshold_value(&compute_histogram(&gray));
    log::debug!("otsu threshold: {threshold}");
    binarize(&gray, threshold)
}

/// Shannon entropy of the occupied bins of `counts`, normalized by `total`.
fn class_entropy(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum()
}

/// Compute the threshold that maximizes the summed background and foreground
/// entropies of a histogram (Kapur, Sahoo and Wong).
///
/// Thresholds are scanned in ascending order and the first maximum wins.
pub fn kapur_threshold_value(hist: &[usize; NUM_BINS]) -> u8 {
    let total = hist.iter().sum::<usize>();

    let mut best_entropy = f64::NEG_INFINITY;
    let mut best_threshold = 0;
    let mut cum_back = 0;

    for t in 0..NUM_BINS {
        cum_back += hist[t];
        let entropy_back = class_entropy(&hist[..=t], cum_back);
        let entropy_fore = class_entropy(&hist[t + 1..], total - cum_back);

        let entropy = entropy_back + entropy_fore;
        if entropy > best_entropy {
            best_entropy = entropy;
            best_threshold = t;
        }
    }

    best_threshold as u8
}

/// Threshold an image with the Kapur maximum entropy method.
///
/// Color input is converted to gray first, the threshold is chosen with
/// [`kapur_threshold_value`] and pixels strictly above it become 255.
pub fn kapur_threshold<I: GrayConvert>(src: &I) -> Result<Image<u8, 1>, ImageError> {
    let gray = src.to_gray()?;
    let threshold = kapur_threshold_value(&compute_histogram(&gray));
    log::debug!("kapur threshold: {threshold}");
    binarize(&gray, threshold)
}

/// Threshold an image tile by tile.
///
/// The image is split in non-overlapping `block_size x block_size` tiles, the
/// last row and column of tiles being clipped to the image. In every tile a
/// pixel becomes 255 when it is strictly greater than `mean(tile) - c`.
///
/// # Errors
///
/// [`ImageError::InvalidBlockSize`] if the block size is zero.
pub fn local_threshold<I: GrayConvert>(
    src: &I,
    config: &LocalThresholdConfig,
) -> Result<Image<u8, 1>, ImageError> {
    config.validate()?;
    let gray = src.to_gray()?;
    let (width, height) = (gray.width(), gray.height());
    let block = config.block_size;
    let src_data = gray.as_slice();

    let mut dst = Image::<u8, 1>::from_size_val(gray.size(), 0)?;

    for y0 in (0..height).step_by(block) {
        let y1 = (y0 + block).min(height);
        for x0 in (0..width).step_by(block) {
            let x1 = (x0 + block).min(width);

            let sum = (y0..y1)
                .map(|y| {
                    src_data[y * width + x0..y * width + x1]
                        .iter()
                        .map(|&v| v as u64)
                        .sum::<u64>()
                })
                .sum::<u64>();
            let threshold = sum as f64 / ((y1 - y0) * (x1 - x0)) as f64 - config.c as f64;

            let dst_data = dst.as_slice_mut();
            for y in y0..y1 {
                for x in x0..x1 {
                    if src_data[y * width + x] as f64 > threshold {
                        dst_data[y * width + x] = FOREGROUND;
                    }
                }
            }
        }
    }

    Ok(dst)
}

/// Summed area table of an image with one extra leading row and column of zeros.
fn integral_image(src: &Image<u8, 1>) -> Vec<u64> {
    let (width, height) = (src.width(), src.height());
    let stride = width + 1;
    let mut table = vec![0u64; stride * (height + 1)];

    for (y, row) in src.as_slice().chunks_exact(width).enumerate() {
        let mut row_sum = 0u64;
        for (x, &v) in row.iter().enumerate() {
            row_sum += v as u64;
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
        }
    }

    table
}

/// Threshold every pixel against the mean of the window centered on it.
///
/// The window side is forced odd (an even size is incremented by one) and the
/// image is extended with reflected borders that exclude the edge pixel. A
/// pixel becomes 255 when it is strictly greater than `mean(window) - c`.
///
/// # Errors
///
/// [`ImageError::InvalidWindowSize`] if the window size is zero.
pub fn adaptive_threshold<I: GrayConvert>(
    src: &I,
    config: &AdaptiveThresholdConfig,
) -> Result<Image<u8, 1>, ImageError> {
    config.validate()?;
    let gray = src.to_gray()?;
    let window = config.effective_window_size();

    let padded = spatial_padding(
        &gray,
        Padding2D::uniform(window / 2),
        PaddingMode::Reflect101,
        [0],
    )?;
    let table = integral_image(&padded);
    let stride = padded.width() + 1;
    let area = (window * window) as f64;
    let c = config.c as f64;
    let src_data = gray.as_slice();
    let width = gray.width();

    let mut dst = Image::<u8, 1>::from_size_val(gray.size(), 0)?;

    parallel::par_iter_rows_indexed(&mut dst, |row, dst_row| {
        // the window of output pixel (row, col) spans padded rows row..row + window
        let (top, bottom) = (row * stride, (row + window) * stride);
        for (col, dst_pixel) in dst_row.iter_mut().enumerate() {
            let (left, right) = (col, col + window);
            let sum = table[bottom + right] + table[top + left]
                - table[top + right]
                - table[bottom + left];
            let mean = sum as f64 / area;
            if src_data[row * width + col] as f64 > mean - c {
                *dst_pixel = FOREGROUND;
            }
        }
    });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use crate::config::{AdaptiveThresholdConfig, LocalThresholdConfig};
    use crate::histogram::compute_histogram;
    use imgkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_threshold_binary() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let data_expected = [0u8, 255, 0, 255, 255, 255];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        super::threshold_binary(&image, &mut thresholded, 100, 255)?;

        assert_eq!(thresholded.as_slice(), data_expected);
        Ok(())
    }

    #[test]
    fn test_threshold_binary_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;
        assert!(super::threshold_binary(&image, &mut dst, 1, 255).is_err());
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_manual_threshold_single_bright_pixel() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                50, 50, 50,
                50, 50, 200,
                50, 50, 50,
            ],
        )?;
        let binary = super::manual_threshold(&image, 127)?;
        assert_eq!(
            binary.as_slice(),
            &[
                0, 0, 0,
                0, 0, 255,
                0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_manual_threshold_rgb() -> Result<(), ImageError> {
        // pure red has a luma of 76
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![255, 0, 0, 255, 255, 255],
        )?;
        let binary = super::manual_threshold(&image, 100)?;
        assert_eq!(binary.as_slice(), &[0, 255]);
        Ok(())
    }

    #[test]
    fn test_otsu_bimodal() -> Result<(), ImageError> {
        let data = (0..64).map(|i| if i % 2 == 0 { 10 } else { 250 }).collect();
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;

        let threshold = super::otsu_threshold_value(&compute_histogram(&image));
        assert!(threshold > 10 && threshold < 250, "threshold: {threshold}");

        let binary = super::otsu_threshold(&image)?;
        for (b, s) in binary.as_slice().iter().zip(image.as_slice()) {
            assert_eq!(*b, if *s == 250 { 255 } else { 0 });
        }
        Ok(())
    }

    #[test]
    fn test_otsu_uniform() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            90,
        )?;
        assert_eq!(super::otsu_threshold_value(&compute_histogram(&image)), 0);
        assert!(super::otsu_threshold(&image)?
            .as_slice()
            .iter()
            .all(|&v| v == 255));
        Ok(())
    }

    #[test]
    fn test_kapur() -> Result<(), ImageError> {
        let mut data = vec![10u8; 6];
        data.extend([20; 2]);
        data.extend([90; 1]);
        data.extend([200; 3]);
        data.extend([210; 5]);
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 17,
                height: 1,
            },
            data,
        )?;

        assert_eq!(super::kapur_threshold_value(&compute_histogram(&image)), 90);

        let binary = super::kapur_threshold(&image)?;
        assert_eq!(binary.as_slice().iter().filter(|&&v| v == 255).count(), 8);
        assert_eq!(binary.as_slice()[8], 0);
        Ok(())
    }

    #[test]
    fn test_kapur_first_maximum_wins() {
        // the only split with entropy is below the lowest value
        let mut hist = [0usize; 256];
        hist[10] = 8;
        hist[250] = 8;
        assert_eq!(super::kapur_threshold_value(&hist), 0);

        // a single occupied bin has zero entropy everywhere
        let mut hist = [0usize; 256];
        hist[42] = 9;
        assert_eq!(super::kapur_threshold_value(&hist), 0);
    }

    #[rustfmt::skip]
    #[test]
    fn test_local_threshold() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize { width: 5, height: 2 },
            vec![
                10, 20, 100, 100, 7,
                10, 20, 100, 100, 9,
            ],
        )?;

        let config = LocalThresholdConfig { block_size: 2, c: 0 };
        let binary = super::local_threshold(&image, &config)?;
        // the last tile is clipped to a single column
        assert_eq!(
            binary.as_slice(),
            &[
                0, 255, 0, 0, 0,
                0, 255, 0, 0, 255,
            ]
        );

        let config = LocalThresholdConfig { block_size: 2, c: 6 };
        let binary = super::local_threshold(&image, &config)?;
        assert_eq!(
            binary.as_slice(),
            &[
                255, 255, 255, 255, 255,
                255, 255, 255, 255, 255,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_local_threshold_invalid_block() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let config = LocalThresholdConfig {
            block_size: 0,
            c: 5,
        };
        assert_eq!(
            super::local_threshold(&image, &config),
            Err(ImageError::InvalidBlockSize(0))
        );
        Ok(())
    }

    #[test]
    fn test_adaptive_threshold() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 5,
                height: 1,
            },
            vec![0, 0, 100, 0, 0],
        )?;

        let config = AdaptiveThresholdConfig {
            window_size: 3,
            c: 0,
        };
        let binary = super::adaptive_threshold(&image, &config)?;
        assert_eq!(binary.as_slice(), &[0, 0, 255, 0, 0]);

        // an even window is bumped to the next odd size
        let config = AdaptiveThresholdConfig {
            window_size: 2,
            c: 0,
        };
        assert_eq!(super::adaptive_threshold(&image, &config)?, binary);
        Ok(())
    }

    #[test]
    fn test_adaptive_threshold_uniform() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 6,
                height: 4,
            },
            120,
        )?;

        // the window is larger than the image and keeps mirroring
        let binary = super::adaptive_threshold(&image, &AdaptiveThresholdConfig::default())?;
        assert!(binary.as_slice().iter().all(|&v| v == 255));

        let config = AdaptiveThresholdConfig {
            window_size: 5,
            c: 0,
        };
        let binary = super::adaptive_threshold(&image, &config)?;
        assert!(binary.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }
}
