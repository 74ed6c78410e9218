use imgkit_image::{Image, ImageError};

use super::kernels::{self, Kernel};
use crate::color::GrayConvert;
use crate::config::{MeanFilterConfig, MedianFilterConfig, SmoothFilterConfig};
use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use crate::parallel;

/// Pad a single channel with `pad` replicated pixels on every side.
fn replicate_padded(src: &Image<u8, 1>, pad: usize) -> Result<Image<u8, 1>, ImageError> {
    spatial_padding(src, Padding2D::uniform(pad), PaddingMode::Replicate, [0])
}

/// Correlate a single channel with a kernel over replicated borders.
///
/// # Returns
///
/// The raw, unclamped response of the kernel at every pixel, accumulated in
/// row-major kernel order.
pub fn filter2d(src: &Image<u8, 1>, kernel: &Kernel) -> Result<Image<f64, 1>, ImageError> {
    let ksize = kernel.size();
    let padded = replicate_padded(src, kernel.pad())?;
    let padded_cols = padded.cols();
    let padded_data = padded.as_slice();

    let mut dst = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;

    parallel::par_iter_rows_indexed(&mut dst, |row, dst_row| {
        for (col, dst_pixel) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f64;
            for (ky, weights) in kernel.data().chunks_exact(ksize).enumerate() {
                let offset = (row + ky) * padded_cols + col;
                let window = &padded_data[offset..offset + ksize];
                for (&w, &val) in weights.iter().zip(window) {
                    acc += w * val as f64;
                }
            }
            *dst_pixel = acc;
        }
    });

    Ok(dst)
}

fn mean_filter_channel(src: &Image<u8, 1>, kernel_size: usize) -> Result<Image<u8, 1>, ImageError> {
    let padded = replicate_padded(src, kernel_size / 2)?;
    let padded_cols = padded.cols();
    let padded_data = padded.as_slice();
    let area = (kernel_size * kernel_size) as f32;

    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    parallel::par_iter_rows_indexed(&mut dst, |row, dst_row| {
        for (col, dst_pixel) in dst_row.iter_mut().enumerate() {
            let mut sum = 0u64;
            for ky in 0..kernel_size {
                let offset = (row + ky) * padded_cols + col;
                sum += padded_data[offset..offset + kernel_size]
                    .iter()
                    .map(|&v| v as u64)
                    .sum::<u64>();
            }
            // truncate the mean like an 8-bit store does
            *dst_pixel = (sum as f32 / area) as u8;
        }
    });

    Ok(dst)
}

fn median_filter_channel(
    src: &Image<u8, 1>,
    kernel_size: usize,
) -> Result<Image<u8, 1>, ImageError> {
    let padded = replicate_padded(src, kernel_size / 2)?;
    let padded_cols = padded.cols();
    let padded_data = padded.as_slice();
    let mid = kernel_size * kernel_size / 2;

    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    parallel::par_iter_rows_indexed(&mut dst, |row, dst_row| {
        let mut window = Vec::with_capacity(kernel_size * kernel_size);
        for (col, dst_pixel) in dst_row.iter_mut().enumerate() {
            window.clear();
            for ky in 0..kernel_size {
                let offset = (row + ky) * padded_cols + col;
                window.extend_from_slice(&padded_data[offset..offset + kernel_size]);
            }
            let (_, median, _) = window.select_nth_unstable(mid);
            *dst_pixel = *median;
        }
    });

    Ok(dst)
}

/// Blur an image with a mean (box) filter.
///
/// Every output pixel is the arithmetic mean of the `kernel_size x kernel_size`
/// neighborhood, borders are replicated and the mean is truncated to an integer.
/// Channels are filtered independently.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `config` - The kernel size.
///
/// # Returns
///
/// The filtered image with the same shape as the input.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::config::MeanFilterConfig;
/// use imgkit_imgproc::filter::mean_filter;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![0, 9, 0],
/// ).unwrap();
///
/// let blurred = mean_filter(&image, &MeanFilterConfig::default()).unwrap();
/// assert_eq!(blurred.as_slice(), &[3, 3, 3]);
/// ```
pub fn mean_filter<const C: usize>(
    src: &Image<u8, C>,
    config: &MeanFilterConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    src.map_channels(|ch| mean_filter_channel(ch, config.kernel_size))
}

/// Denoise an image with a median filter.
///
/// Every output pixel is the median of the `kernel_size x kernel_size`
/// neighborhood with replicated borders. Channels are filtered independently.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `config` - The kernel size.
pub fn median_filter<const C: usize>(
    src: &Image<u8, C>,
    config: &MedianFilterConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    src.map_channels(|ch| median_filter_channel(ch, config.kernel_size))
}

/// Sharpen an image with the 3x3 kernel `[[-1,-1,-1],[-1,9,-1],[-1,-1,-1]]`.
///
/// The response is clamped to [0, 255]. Channels are filtered independently.
pub fn sharpen<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, C>, ImageError> {
    let kernel = kernels::sharpen_kernel();
    src.map_channels(|ch| {
        let response = filter2d(ch, &kernel)?;
        let data = response
            .as_slice()
            .iter()
            .map(|&v| v.clamp(0.0, 255.0) as u8)
            .collect();
        Image::new(ch.size(), data)
    })
}

/// Smooth an image with a normalized gaussian-like kernel.
///
/// See [`kernels::smooth_kernel`] for the weights. The weighted sum is computed
/// in `f64` and truncated to an integer, so a flat region can land one level
/// below its input when the normalized weights sum to just under 1. Channels
/// are filtered independently.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `config` - The kernel size.
pub fn smooth<const C: usize>(
    src: &Image<u8, C>,
    config: &SmoothFilterConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    let kernel = kernels::smooth_kernel(config.kernel_size)?;
    src.map_channels(|ch| {
        let response = filter2d(ch, &kernel)?;
        let data = response
            .as_slice()
            .iter()
            .map(|&v| v.clamp(0.0, 255.0) as u8)
            .collect();
        Image::new(ch.size(), data)
    })
}

/// Compute the sobel gradient magnitude of an image scaled to [0, 255].
///
/// The image is converted to grayscale, the horizontal and vertical sobel
/// responses are combined as `sqrt(gx² + gy²)` and the whole map is divided by
/// its maximum and multiplied by 255. A uniform image has no gradient and maps
/// to an all-zero image.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::filter::edge_detection;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 42).unwrap();
/// let edges = edge_detection(&image).unwrap();
/// assert!(edges.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn edge_detection<I: GrayConvert>(src: &I) -> Result<Image<u8, 1>, ImageError> {
    let gray = src.to_gray()?;
    let (kernel_x, kernel_y) = kernels::sobel_kernels();

    let gx = filter2d(&gray, &kernel_x)?;
    let gy = filter2d(&gray, &kernel_y)?;

    let magnitude = gx
        .as_slice()
        .iter()
        .zip(gy.as_slice())
        .map(|(&gx, &gy)| {
            // sobel responses are integers, exact in f32
            let (gx, gy) = (gx as f32, gy as f32);
            (gx * gx + gy * gy).sqrt()
        })
        .collect::<Vec<f32>>();

    let max = magnitude.iter().copied().fold(0.0f32, f32::max);
    if max == 0.0 {
        log::debug!("edge_detection: uniform image, no gradient to rescale");
        return Image::from_size_val(gray.size(), 0);
    }

    let data = magnitude
        .iter()
        .map(|&m| (m / max * 255.0) as u8)
        .collect();

    Image::new(gray.size(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgkit_image::ImageSize;

    #[test]
    fn test_mean_filter_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            (0..12).collect(),
        )?;
        let out = mean_filter(&image, &MeanFilterConfig { kernel_size: 1 })?;
        assert_eq!(out, image);
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_mean_filter_truncates() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                0, 0, 0,
                0, 10, 0,
                0, 0, 0,
            ],
        )?;
        let out = mean_filter(&image, &MeanFilterConfig::default())?;
        // every 3x3 window sees the center pixel once: 10 / 9 = 1.11
        assert_eq!(out.as_slice(), &[1; 9]);
        Ok(())
    }

    #[test]
    fn test_mean_filter_rejects_even_kernel() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0,
        )?;
        let res = mean_filter(&image, &MeanFilterConfig { kernel_size: 2 });
        assert_eq!(res, Err(ImageError::InvalidKernelSize(2)));
        Ok(())
    }

    #[test]
    fn test_mean_filter_rejects_oversized_kernel() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 1,
                height: 1,
            },
            255,
        )?;
        let res = mean_filter(&image, &MeanFilterConfig { kernel_size: 4105 });
        assert_eq!(res, Err(ImageError::InvalidKernelSize(4105)));

        let out = mean_filter(&image, &MeanFilterConfig { kernel_size: 101 })?;
        assert_eq!(out.as_slice(), &[255]);
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_median_filter_removes_salt() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                10, 10, 10,
                10, 255, 10,
                10, 10, 10,
            ],
        )?;
        let out = median_filter(&image, &MedianFilterConfig::default())?;
        assert_eq!(out.as_slice(), &[10; 9]);
        Ok(())
    }

    #[test]
    fn test_median_filter_per_channel() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![1, 100, 7, 2, 0, 7, 3, 50, 7],
        )?;
        let out = median_filter(&image, &MedianFilterConfig::default())?;
        // replicated rows: the column windows are [1,1,2], [1,2,3], [2,3,3]
        assert_eq!(out.channel(0)?.as_slice(), &[1, 2, 3]);
        assert_eq!(out.channel(1)?.as_slice(), &[100, 50, 50]);
        assert_eq!(out.channel(2)?.as_slice(), &[7, 7, 7]);
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_sharpen_clamps() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 1 },
            vec![0, 100, 0],
        )?;
        let out = sharpen(&image)?;
        // left: -3 * 100 = -300, center: 9 * 100 - 2 * 100 = 700
        assert_eq!(out.as_slice(), &[0, 255, 0]);

        let flat = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 77)?;
        assert_eq!(sharpen(&flat)?, flat);
        Ok(())
    }

    #[test]
    fn test_smooth_keeps_shape() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 7,
                height: 5,
            },
            (0..7 * 5 * 3).map(|v| (v * 7 % 256) as u8).collect(),
        )?;
        let out = smooth(&image, &SmoothFilterConfig::default())?;
        assert_eq!(out.size(), image.size());
        assert_eq!(out.num_channels(), 3);
        Ok(())
    }

    #[test]
    fn test_smooth_step_is_monotonic() -> Result<(), ImageError> {
        let mut data = vec![0u8; 10];
        data[5..].fill(200);
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 10,
                height: 1,
            },
            data,
        )?;
        let out = smooth(&image, &SmoothFilterConfig::default())?;
        let values = out.as_slice();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        // the plateau sums to 199.99999999999997 and truncates
        assert_eq!(values, &[0, 0, 0, 30, 74, 125, 169, 199, 199, 199]);
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_edge_detection_step() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize { width: 4, height: 2 },
            vec![
                0, 0, 100, 100,
                0, 0, 100, 100,
            ],
        )?;
        let edges = edge_detection(&image)?;
        // the two columns next to the step share the maximum response
        assert_eq!(
            edges.as_slice(),
            &[
                0, 255, 255, 0,
                0, 255, 255, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_edge_detection_rgb_input() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            90,
        )?;
        let edges = edge_detection(&image)?;
        assert_eq!(edges.num_channels(), 1);
        assert!(edges.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }
}
