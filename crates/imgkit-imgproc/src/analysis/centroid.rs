use imgkit_image::{Image, ImageError};

use crate::color::{GrayConvert, RgbConvert};
use crate::draw::draw_filled_circle;

/// Radius in pixels of the disc drawn by [`mark_centroid`].
pub const MARKER_RADIUS: i64 = 8;

/// Color of the disc drawn by [`mark_centroid`], pure red in RGB order.
pub const MARKER_COLOR: [u8; 3] = [255, 0, 0];

/// The center of mass of the foreground of a binary image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centroid {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

/// Compute the center of mass of the foreground of an image.
///
/// Color input is converted to gray first and every non-zero pixel is
/// foreground. Both coordinates are the truncated mean of the foreground
/// pixel coordinates.
///
/// # Returns
///
/// `None` if the image has no foreground pixel.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::analysis::{centroid, Centroid};
///
/// let mut image = Image::<u8, 1>::from_size_val(ImageSize { width: 8, height: 8 }, 0).unwrap();
/// image.set_pixel(3, 4, 0, 255).unwrap();
///
/// assert_eq!(centroid(&image).unwrap(), Some(Centroid { x: 3, y: 4 }));
/// ```
pub fn centroid<I: GrayConvert>(src: &I) -> Result<Option<Centroid>, ImageError> {
    let gray = src.to_gray()?;
    let width = gray.width();

    let (count, sum_x, sum_y) = gray
        .as_slice()
        .chunks_exact(width)
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v > 0)
                .map(move |(x, _)| (x, y))
        })
        .fold((0usize, 0usize, 0usize), |(n, sx, sy), (x, y)| {
            (n + 1, sx + x, sy + y)
        });

    if count == 0 {
        return Ok(None);
    }

    Ok(Some(Centroid {
        x: sum_x / count,
        y: sum_y / count,
    }))
}

/// Mark a centroid with a filled red disc on an RGB copy of the image.
///
/// Gray input is expanded to RGB. The disc has a radius of [`MARKER_RADIUS`]
/// and is clipped to the image. Without a centroid the RGB copy is returned
/// as is.
pub fn mark_centroid<I: RgbConvert>(
    src: &I,
    centroid: Option<Centroid>,
) -> Result<Image<u8, 3>, ImageError> {
    let mut marked = src.to_rgb()?;
    if let Some(c) = centroid {
        draw_filled_circle(
            &mut marked,
            (c.x as i64, c.y as i64),
            MARKER_RADIUS,
            MARKER_COLOR,
        );
    }
    Ok(marked)
}
