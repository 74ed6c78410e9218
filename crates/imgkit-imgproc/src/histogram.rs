use imgkit_image::Image;
use rayon::prelude::*;

/// Number of bins of an 8-bit histogram.
pub const NUM_BINS: usize = 256;

/// Images with at least this many pixels are counted in parallel chunks.
const PARALLEL_MIN_PIXELS: usize = 1 << 16;

/// Pixels counted per parallel chunk.
const CHUNK_SIZE: usize = 4096;

/// Compute the pixel intensity histogram of a single channel 8-bit image.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
///
/// # Returns
///
/// The number of occurrences of every value in 0..=255. Large images are
/// counted in parallel chunks whose partial histograms are summed.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let histogram = compute_histogram(&image);
/// assert_eq!(histogram[255], 2);
/// assert_eq!(histogram.iter().sum::<usize>(), 9);
/// ```
pub fn compute_histogram(src: &Image<u8, 1>) -> [usize; NUM_BINS] {
    let data = src.as_slice();
    if data.len() >= PARALLEL_MIN_PIXELS {
        par_count_values(data)
    } else {
        count_values(data.iter().copied())
    }
}

/// Compute one histogram per channel of an 8-bit image, in channel order.
pub fn compute_histograms<const C: usize>(src: &Image<u8, C>) -> [[usize; NUM_BINS]; C] {
    std::array::from_fn(|ch| count_values(src.as_slice().iter().skip(ch).step_by(C).copied()))
}

fn count_values(values: impl Iterator<Item = u8>) -> [usize; NUM_BINS] {
    let mut hist = [0usize; NUM_BINS];
    for px in values {
        hist[px as usize] += 1;
    }
    hist
}

fn par_count_values(data: &[u8]) -> [usize; NUM_BINS] {
    data.par_chunks(CHUNK_SIZE)
        .fold(
            || [0usize; NUM_BINS],
            |mut local, chunk| {
                for &px in chunk {
                    local[px as usize] += 1;
                }
                local
            },
        )
        .reduce(
            || [0usize; NUM_BINS],
            |mut a, b| {
                for (acc, val) in a.iter_mut().zip(b.iter()) {
                    *acc += val;
                }
                a
            },
        )
}

/// Running sum of a histogram: `cdf[v]` is the number of values `<= v`.
pub fn cumulative_histogram(hist: &[usize; NUM_BINS]) -> [usize; NUM_BINS] {
    let mut cdf = [0usize; NUM_BINS];
    let mut acc = 0;
    for (c, &h) in cdf.iter_mut().zip(hist.iter()) {
        acc += h;
        *c = acc;
    }
    cdf
}
