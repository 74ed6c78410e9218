use imgkit_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,
}

impl PaddingMode {
    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else if i >= len {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect101`: mirror excluding edge, repeated until the index falls inside
    /// - `Constant`: `None` outside the valid range
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        match self {
            PaddingMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingMode::Reflect101 => Some(Self::reflect101(i, len)),
            PaddingMode::Constant => {
                if i >= 0 && (i as usize) < len {
                    Some(i as usize)
                } else {
                    None
                }
            }
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same amount of padding on every side.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// The size of an image of `size` after applying this padding.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Pad an image into a new, larger buffer.
///
/// The padded image is scratch memory owned by the caller; the source image is
/// never modified.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `padding` - The amount of padding on each side.
/// * `mode` - How the border is filled.
/// * `constant_value` - The per-channel value used by [`PaddingMode::Constant`].
///
/// # Examples
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![1, 2, 3]).unwrap();
/// let padded = spatial_padding(&image, Padding2D::uniform(1), PaddingMode::Replicate, [0]).unwrap();
///
/// assert_eq!(padded.size(), ImageSize { width: 5, height: 3 });
/// assert_eq!(&padded.as_slice()[5..10], &[1, 1, 2, 3, 3]);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    padding: Padding2D,
    mode: PaddingMode,
    constant_value: [T; C],
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    let padded_size = padding.padded_size(src.size());
    let mut dst = Image::from_size_val(padded_size, constant_value[0])?;

    let (src_w, src_h) = (src.width(), src.height());
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(padded_size.width * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = mode.map_index(y as isize - padding.top as isize, src_h);
            for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let src_x = mode.map_index(x as isize - padding.left as isize, src_w);
                match (src_y, src_x) {
                    (Some(sy), Some(sx)) => {
                        let offset = (sy * src_w + sx) * C;
                        dst_pixel.copy_from_slice(&src_data[offset..offset + C]);
                    }
                    _ => dst_pixel.copy_from_slice(&constant_value),
                }
            }
        });

    Ok(dst)
}
