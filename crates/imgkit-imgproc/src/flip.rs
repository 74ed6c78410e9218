use std::str::FromStr;

use imgkit_image::{Image, ImageError};
use rayon::prelude::*;

/// The axis an image is mirrored about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipMode {
    /// Mirror the columns (left becomes right).
    Horizontal,
    /// Mirror the rows (top becomes bottom).
    Vertical,
}

impl FromStr for FlipMode {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(FlipMode::Horizontal),
            "vertical" => Ok(FlipMode::Vertical),
            other => Err(ImageError::InvalidFlipMode(other.to_string())),
        }
    }
}

/// Flip the input image horizontally.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
///
/// # Returns
///
/// The flipped image.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::flip::horizontal_flip;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![1, 2, 3, 4, 5, 6],
/// )
/// .unwrap();
///
/// let flipped = horizontal_flip(&image).unwrap();
/// assert_eq!(flipped.as_slice(), &[4, 5, 6, 1, 2, 3]);
/// ```
pub fn horizontal_flip<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    let mut dst = src.clone();
    let cols = src.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .zip(src.as_slice().par_chunks_exact(cols * C))
        .for_each(|(dst_row, src_row)| {
            for (dst_pixel, src_pixel) in dst_row
                .chunks_exact_mut(C)
                .zip(src_row.chunks_exact(C).rev())
            {
                dst_pixel.copy_from_slice(src_pixel);
            }
        });

    Ok(dst)
}

/// Flip the input image vertically.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
///
/// # Returns
///
/// The flipped image.
pub fn vertical_flip<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    let mut dst = src.clone();
    let row_stride = src.cols() * C;
    let rows = src.rows();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(row, dst_row)| {
            let offset = (rows - 1 - row) * row_stride;
            dst_row.copy_from_slice(&src_data[offset..offset + row_stride]);
        });

    Ok(dst)
}

/// Flip an image about the axis given by `mode`.
pub fn flip<T, const C: usize>(src: &Image<T, C>, mode: FlipMode) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    match mode {
        FlipMode::Horizontal => horizontal_flip(src),
        FlipMode::Vertical => vertical_flip(src),
    }
}

#[cfg(test)]
mod tests {
    use super::FlipMode;
    use imgkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0u8, 1, 2, 3, 4, 5],
        )?;
        let data_expected = vec![1u8, 0, 3, 2, 5, 4];
        let flipped = super::horizontal_flip(&image)?;
        assert_eq!(flipped.as_slice(), &data_expected);
        Ok(())
    }

    #[test]
    fn test_vflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0u8, 1, 2, 3, 4, 5],
        )?;
        let data_expected = vec![4u8, 5, 2, 3, 0, 1];
        let flipped = super::vertical_flip(&image)?;
        assert_eq!(flipped.as_slice(), &data_expected);
        Ok(())
    }

    #[test]
    fn test_flip_twice_is_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            (0..18).collect(),
        )?;
        for mode in [FlipMode::Horizontal, FlipMode::Vertical] {
            let twice = super::flip(&super::flip(&image, mode)?, mode)?;
            assert_eq!(twice, image);
        }
        Ok(())
    }

    #[test]
    fn test_flip_mode_from_str() {
        assert_eq!("horizontal".parse::<FlipMode>(), Ok(FlipMode::Horizontal));
        assert_eq!("vertical".parse::<FlipMode>(), Ok(FlipMode::Vertical));
        assert_eq!(
            "diagonal".parse::<FlipMode>(),
            Err(ImageError::InvalidFlipMode("diagonal".to_string()))
        );
    }
}
