use imgkit_image::{Image, ImageError};

use crate::config::MorphologyConfig;
use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use crate::parallel;

/// The reduction applied over the structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MorphOp {
    Dilate,
    Erode,
}

impl MorphOp {
    /// Value of the pixels outside the image, neutral for the reduction.
    fn border_value(&self) -> u8 {
        match self {
            MorphOp::Dilate => 0,
            MorphOp::Erode => 255,
        }
    }

    fn reduce(&self, window: impl Iterator<Item = u8>) -> u8 {
        match self {
            MorphOp::Dilate => window.fold(u8::MIN, u8::max),
            MorphOp::Erode => window.fold(u8::MAX, u8::min),
        }
    }
}

fn morphology_channel(
    src: &Image<u8, 1>,
    kernel_size: usize,
    op: MorphOp,
) -> Result<Image<u8, 1>, ImageError> {
    let padded = spatial_padding(
        src,
        Padding2D::uniform(kernel_size / 2),
        PaddingMode::Constant,
        [op.border_value()],
    )?;
    let padded_cols = padded.cols();
    let padded_data = padded.as_slice();

    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    parallel::par_iter_rows_indexed(&mut dst, |row, dst_row| {
        for (col, dst_pixel) in dst_row.iter_mut().enumerate() {
            let window = (0..kernel_size).flat_map(|ky| {
                let offset = (row + ky) * padded_cols + col;
                padded_data[offset..offset + kernel_size].iter().copied()
            });
            *dst_pixel = op.reduce(window);
        }
    });

    Ok(dst)
}

/// Dilate a binary image with a square structuring element.
///
/// Every output pixel is the maximum of its `kernel_size x kernel_size`
/// neighborhood. Pixels outside the image count as 0, so the border never
/// grows the foreground. Channels are processed independently.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::config::MorphologyConfig;
/// use imgkit_imgproc::morphology::dilate;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 1 }, vec![0, 255, 0, 0]).unwrap();
/// let dilated = dilate(&image, &MorphologyConfig::default()).unwrap();
/// assert_eq!(dilated.as_slice(), &[255, 255, 255, 0]);
/// ```
pub fn dilate<const C: usize>(
    src: &Image<u8, C>,
    config: &MorphologyConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    src.map_channels(|ch| morphology_channel(ch, config.kernel_size, MorphOp::Dilate))
}

/// Erode a binary image with a square structuring element.
///
/// Every output pixel is the minimum of its `kernel_size x kernel_size`
/// neighborhood. Pixels outside the image count as 255, so the border never
/// eats into the foreground. Channels are processed independently.
pub fn erode<const C: usize>(
    src: &Image<u8, C>,
    config: &MorphologyConfig,
) -> Result<Image<u8, C>, ImageError> {
    config.validate()?;
    src.map_channels(|ch| morphology_channel(ch, config.kernel_size, MorphOp::Erode))
}
