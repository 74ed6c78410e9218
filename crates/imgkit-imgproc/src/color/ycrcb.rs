use crate::parallel;
use imgkit_image::{Image, ImageError};

const DELTA: f64 = 128.0;

#[inline]
fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB8 image to an 8-bit YCrCb image.
///
/// The output channels are, in order:
///
/// * Y  = 0.299 * R + 0.587 * G + 0.114 * B
/// * Cr = (R - Y) * 0.713 + 128
/// * Cb = (B - Y) * 0.564 + 128
///
/// Every channel is rounded and saturated to [0, 255].
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::color::ycrcb_from_rgb;
///
/// let image = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![128, 128, 128]).unwrap();
/// let ycrcb = ycrcb_from_rgb(&image).unwrap();
/// assert_eq!(ycrcb.as_slice(), &[128, 128, 128]);
/// ```
pub fn ycrcb_from_rgb(src: &Image<u8, 3>) -> Result<Image<u8, 3>, ImageError> {
    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f64;
        let g = src_pixel[1] as f64;
        let b = src_pixel[2] as f64;

        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let cr = (r - y) * 0.713 + DELTA;
        let cb = (b - y) * 0.564 + DELTA;

        dst_pixel[0] = saturate(y);
        dst_pixel[1] = saturate(cr);
        dst_pixel[2] = saturate(cb);
    });

    Ok(dst)
}

/// Convert an 8-bit YCrCb image back to RGB8.
///
/// * R = Y + 1.403 * (Cr - 128)
/// * G = Y - 0.714 * (Cr - 128) - 0.344 * (Cb - 128)
/// * B = Y + 1.773 * (Cb - 128)
///
/// Every channel is rounded and saturated to [0, 255].
pub fn rgb_from_ycrcb(src: &Image<u8, 3>) -> Result<Image<u8, 3>, ImageError> {
    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        let y = src_pixel[0] as f64;
        let cr = src_pixel[1] as f64 - DELTA;
        let cb = src_pixel[2] as f64 - DELTA;

        dst_pixel[0] = saturate(y + 1.403 * cr);
        dst_pixel[1] = saturate(y - 0.714 * cr - 0.344 * cb);
        dst_pixel[2] = saturate(y + 1.773 * cb);
    });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use imgkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn ycrcb_gray_pixels_have_neutral_chroma() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![0, 0, 0, 77, 77, 77, 255, 255, 255],
        )?;

        let ycrcb = super::ycrcb_from_rgb(&image)?;
        assert_eq!(ycrcb.as_slice(), &[0, 128, 128, 77, 128, 128, 255, 128, 128]);

        let rgb = super::rgb_from_ycrcb(&ycrcb)?;
        assert_eq!(rgb, image);

        Ok(())
    }

    #[test]
    fn ycrcb_roundtrip_is_close() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![200, 30, 90, 15, 180, 240],
        )?;

        let rgb = super::rgb_from_ycrcb(&super::ycrcb_from_rgb(&image)?)?;
        for (a, b) in rgb.as_slice().iter().zip(image.as_slice()) {
            assert!((*a as i32 - *b as i32).abs() <= 2, "{a} vs {b}");
        }

        Ok(())
    }
}
