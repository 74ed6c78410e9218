use imgkit_image::Image;

/// Write a pixel, ignoring coordinates outside the image.
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draw a filled circle on an image.
///
/// Every pixel `(x, y)` with `(x - cx)^2 + (y - cy)^2 <= radius^2` takes
/// `color`. The parts of the disc outside the image are clipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `center` - The `(x, y)` center of the circle, may lie outside the image.
/// * `radius` - The radius in pixels.
/// * `color` - The per-channel color.
pub fn draw_filled_circle<const C: usize>(
    img: &mut Image<u8, C>,
    center: (i64, i64),
    radius: i64,
    color: [u8; C],
) {
    let (cx, cy) = center;
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                set_pixel(img, cx + dx, cy + dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use imgkit_image::{Image, ImageError, ImageSize};

    #[rustfmt::skip]
    #[test]
    fn test_draw_filled_circle() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(ImageSize { width: 5, height: 5 }, 0)?;
        super::draw_filled_circle(&mut img, (2, 2), 1, [9]);
        assert_eq!(
            img.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 0, 9, 0, 0,
                0, 9, 9, 9, 0,
                0, 0, 9, 0, 0,
                0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_filled_circle_clipped() -> Result<(), ImageError> {
        let mut img = Image::<u8, 3>::from_size_val(ImageSize { width: 2, height: 2 }, 0)?;
        super::draw_filled_circle(&mut img, (-1, 0), 1, [255, 0, 0]);
        assert_eq!(
            img.as_slice(),
            &[
                255, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }
}
