use crate::parallel;
use imgkit_image::{Image, ImageError};

/// Define the RGB weights for the grayscale conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = round(0.299 * R + 0.587 * G + 0.114 * B)
///
/// # Arguments
///
/// * `src` - The input RGB image.
///
/// # Returns
///
/// A single channel image with the same size as the input.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::color::gray_from_rgb;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 255, 0, 0],
/// )
/// .unwrap();
///
/// let gray = gray_from_rgb(&image).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.as_slice(), &[255, 76]);
/// ```
pub fn gray_from_rgb(src: &Image<u8, 3>) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f64;
        let g = src_pixel[1] as f64;
        let b = src_pixel[2] as f64;
        dst_pixel[0] = (RW * r + GW * g + BW * b).round().clamp(0.0, 255.0) as u8;
    });

    Ok(dst)
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all three channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
///
/// # Returns
///
/// A three channel image with the same size as the input.
pub fn rgb_from_gray(src: &Image<u8, 1>) -> Result<Image<u8, 3>, ImageError> {
    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        dst_pixel.fill(src_pixel[0]);
    });

    Ok(dst)
}

/// Images that can be turned into a single channel intensity image.
///
/// Operators that only work on intensities accept any `GrayConvert` input, so a
/// color image is converted with [`gray_from_rgb`] and a gray image is copied.
pub trait GrayConvert {
    /// Return the intensity image.
    fn to_gray(&self) -> Result<Image<u8, 1>, ImageError>;
}

impl GrayConvert for Image<u8, 1> {
    fn to_gray(&self) -> Result<Image<u8, 1>, ImageError> {
        Ok(self.clone())
    }
}

impl GrayConvert for Image<u8, 3> {
    fn to_gray(&self) -> Result<Image<u8, 1>, ImageError> {
        gray_from_rgb(self)
    }
}

/// Images that can be turned into a three channel RGB image.
pub trait RgbConvert {
    /// Return the RGB image.
    fn to_rgb(&self) -> Result<Image<u8, 3>, ImageError>;
}

impl RgbConvert for Image<u8, 1> {
    fn to_rgb(&self) -> Result<Image<u8, 3>, ImageError> {
        rgb_from_gray(self)
    }
}

impl RgbConvert for Image<u8, 3> {
    fn to_rgb(&self) -> Result<Image<u8, 3>, ImageError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{GrayConvert, RgbConvert};
    use imgkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn gray_from_rgb() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![0, 0, 0, 0, 255, 0, 10, 20, 30],
        )?;

        let gray = super::gray_from_rgb(&image)?;
        // 0.299 * 10 + 0.587 * 20 + 0.114 * 30 = 18.15
        assert_eq!(gray.as_slice(), &[0, 150, 18]);

        Ok(())
    }

    #[test]
    fn rgb_from_gray() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![7, 200],
        )?;

        let rgb = super::rgb_from_gray(&image)?;
        assert_eq!(rgb.as_slice(), &[7, 7, 7, 200, 200, 200]);

        Ok(())
    }

    #[test]
    fn gray_roundtrip_through_traits() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0, 64, 128, 255],
        )?;

        assert_eq!(image.to_gray()?, image);
        assert_eq!(image.to_rgb()?.to_gray()?, image);

        Ok(())
    }
}
