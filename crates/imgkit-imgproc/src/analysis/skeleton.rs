use imgkit_image::{Image, ImageError};

use crate::color::GrayConvert;
use crate::threshold::{manual_threshold, FOREGROUND};

/// Gray level above which a pixel is foreground before thinning.
pub const SKELETON_THRESHOLD: u8 = 127;

/// A thinning algorithm reducing the foreground of a binary image to a one
/// pixel wide skeleton.
///
/// Implementations take a 0/255 image and return a 0/255 image of the same
/// size whose foreground is a subset of the input foreground with the same
/// number of 8-connected components.
pub trait Thinning {
    /// Thin the foreground of `src`.
    fn thin(&self, src: &Image<u8, 1>) -> Result<Image<u8, 1>, ImageError>;
}

/// Zhang-Suen thinning.
///
/// Each pass runs two sub-iterations. A sub-iteration first collects the
/// candidate pixels against the state of the image when it starts, then
/// removes them in raster order, checking the removal conditions again
/// against the current state before every removal. The passes stop once a
/// full pass removes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZhangSuen;

/// Working buffer of 0/1 values with a bounds checked neighbor lookup.
struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    fn from_binary(src: &Image<u8, 1>) -> Self {
        Self {
            width: src.width(),
            height: src.height(),
            cells: src.as_slice().iter().map(|&v| u8::from(v > 0)).collect(),
        }
    }

    #[inline]
    fn at(&self, x: isize, y: isize) -> u8 {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return 0;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// The neighbors P2..P9 clockwise, starting north.
    fn neighbors(&self, x: usize, y: usize) -> [u8; 8] {
        let (x, y) = (x as isize, y as isize);
        [
            self.at(x, y - 1),
            self.at(x + 1, y - 1),
            self.at(x + 1, y),
            self.at(x + 1, y + 1),
            self.at(x, y + 1),
            self.at(x - 1, y + 1),
            self.at(x - 1, y),
            self.at(x - 1, y - 1),
        ]
    }

    fn removable(&self, x: usize, y: usize, first: bool) -> bool {
        if self.cells[y * self.width + x] == 0 {
            return false;
        }

        let p = self.neighbors(x, y);
        let [p2, _, p4, _, p6, _, p8, _] = p;

        let count = p.iter().filter(|&&v| v == 1).count();
        if !(2..=6).contains(&count) {
            return false;
        }

        let transitions = (0..8).filter(|&i| p[i] == 0 && p[(i + 1) % 8] == 1).count();
        if transitions != 1 {
            return false;
        }

        if first {
            p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0
        } else {
            p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0
        }
    }

    /// Run one sub-iteration and return the number of removed pixels.
    fn sub_iteration(&mut self, first: bool) -> usize {
        let candidates = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.removable(x, y, first))
            .collect::<Vec<_>>();

        let mut removed = 0;
        for (x, y) in candidates {
            if self.removable(x, y, first) {
                self.cells[y * self.width + x] = 0;
                removed += 1;
            }
        }
        removed
    }
}

impl Thinning for ZhangSuen {
    fn thin(&self, src: &Image<u8, 1>) -> Result<Image<u8, 1>, ImageError> {
        let mut grid = Grid::from_binary(src);

        let mut passes = 0;
        loop {
            passes += 1;
            let removed = grid.sub_iteration(true) + grid.sub_iteration(false);
            if removed == 0 {
                break;
            }
        }
        log::debug!("zhang-suen thinning converged after {passes} passes");

        let data = grid.cells.iter().map(|&v| v * FOREGROUND).collect();
        Image::new(src.size(), data)
    }
}

/// Reduce the foreground of an image to a one pixel wide skeleton.
///
/// Color input is converted to gray, pixels above [`SKELETON_THRESHOLD`]
/// become foreground and the result is thinned with [`ZhangSuen`].
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::analysis::skeletonize;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 9, height: 3 }, 255).unwrap();
/// let skeleton = skeletonize(&image).unwrap();
///
/// let foreground = skeleton.as_slice().iter().filter(|&&v| v == 255).count();
/// assert!(foreground > 0 && foreground < 27);
/// ```
pub fn skeletonize<I: GrayConvert>(src: &I) -> Result<Image<u8, 1>, ImageError> {
    skeletonize_with(src, &ZhangSuen)
}

/// Like [`skeletonize`] with a custom thinning algorithm.
pub fn skeletonize_with<I: GrayConvert, T: Thinning>(
    src: &I,
    thinning: &T,
) -> Result<Image<u8, 1>, ImageError> {
    let binary = manual_threshold(src, SKELETON_THRESHOLD)?;
    thinning.thin(&binary)
}
