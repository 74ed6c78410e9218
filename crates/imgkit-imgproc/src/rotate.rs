use imgkit_image::{Image, ImageError, ImageSize};

use crate::parallel;

/// A rotation by a multiple of 90 degrees, counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// 90 degrees counterclockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees counterclockwise, i.e. 90 degrees clockwise.
    Deg270,
}

impl TryFrom<i32> for Rotation {
    type Error = ImageError;

    fn try_from(angle: i32) -> Result<Self, Self::Error> {
        match angle {
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(ImageError::InvalidRotationAngle(angle)),
        }
    }
}

impl Rotation {
    /// The size of an image of `size` after the rotation.
    pub fn rotated_size(&self, size: ImageSize) -> ImageSize {
        match self {
            Rotation::Deg180 => size,
            Rotation::Deg90 | Rotation::Deg270 => ImageSize {
                width: size.height,
                height: size.width,
            },
        }
    }
}

/// Rotate an image counterclockwise by a multiple of 90 degrees.
///
/// The pixels are remapped exactly, without interpolation. For [`Rotation::Deg90`]
/// the pixel at `(row r, col c)` of an `H x W` image lands at
/// `(row W - 1 - c, col r)` of the `W x H` output.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::rotate::{rotate, Rotation};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![1, 2]).unwrap();
/// let rotated = rotate(&image, Rotation::Deg90).unwrap();
/// assert_eq!(rotated.size(), ImageSize { width: 1, height: 2 });
/// assert_eq!(rotated.as_slice(), &[2, 1]);
/// ```
pub fn rotate<T, const C: usize>(
    src: &Image<T, C>,
    rotation: Rotation,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let (src_w, src_h) = (src.width(), src.height());
    let mut dst = Image::<T, C>::from_size_val(rotation.rotated_size(src.size()), T::default())?;
    let src_data = src.as_slice();

    parallel::par_iter_rows_indexed(&mut dst, |row, dst_row| {
        for (col, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let (src_row, src_col) = match rotation {
                Rotation::Deg90 => (col, src_w - 1 - row),
                Rotation::Deg180 => (src_h - 1 - row, src_w - 1 - col),
                Rotation::Deg270 => (src_h - 1 - col, row),
            };
            let offset = (src_row * src_w + src_col) * C;
            dst_pixel.copy_from_slice(&src_data[offset..offset + C]);
        }
    });

    Ok(dst)
}

/// Rotate an image by `angle` degrees, which must be 90, 180 or 270.
///
/// # Errors
///
/// [`ImageError::InvalidRotationAngle`] for any other angle.
pub fn rotate_by<T, const C: usize>(src: &Image<T, C>, angle: i32) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    rotate(src, Rotation::try_from(angle)?)
}
