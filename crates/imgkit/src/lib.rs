//! Classical image processing operators: spatial filters, histogram
//! operators, geometric transforms, thresholds, binary morphology and shape
//! analysis on 8-bit gray and RGB images.
//!
//! ```no_run
//! use imgkit::imgproc::{config::MeanFilterConfig, filter::mean_filter};
//! use imgkit::io::functional as F;
//!
//! let image = F::read_image_rgb8("input.png").unwrap();
//! let blurred = mean_filter(&image, &MeanFilterConfig::default()).unwrap();
//! F::write_image_rgb8("blurred.png", &blurred).unwrap();
//! ```

#[doc(inline)]
pub use imgkit_image as image;

#[doc(inline)]
pub use imgkit_imgproc as imgproc;

#[doc(inline)]
pub use imgkit_io as io;
