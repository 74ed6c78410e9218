//! Operator parameters.
//!
//! Every parameterized operator takes one of these structs. The defaults are the
//! values the interactive tool offers, and `validate` is called by the operator
//! before any pixel is touched.

use imgkit_image::ImageError;
use serde::{Deserialize, Serialize};

/// Largest side of a filter or morphology kernel.
pub const MAX_KERNEL_SIZE: usize = 101;

/// Largest tile side of the block local threshold.
pub const MAX_BLOCK_SIZE: usize = 64;

/// Largest window side of the adaptive threshold, before an even size is bumped.
pub const MAX_WINDOW_SIZE: usize = 101;

fn check_odd_kernel(kernel_size: usize) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 || kernel_size > MAX_KERNEL_SIZE {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }
    Ok(())
}

/// Parameters of the mean filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanFilterConfig {
    /// Side of the square neighborhood. Odd, in `[1, MAX_KERNEL_SIZE]`. Default 3.
    pub kernel_size: usize,
}

impl Default for MeanFilterConfig {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl MeanFilterConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        check_odd_kernel(self.kernel_size)
    }
}

/// Parameters of the median filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianFilterConfig {
    /// Side of the square neighborhood. Odd, in `[1, MAX_KERNEL_SIZE]`. Default 3.
    pub kernel_size: usize,
}

impl Default for MedianFilterConfig {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl MedianFilterConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        check_odd_kernel(self.kernel_size)
    }
}

/// Parameters of the gaussian-like smoothing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothFilterConfig {
    /// Side of the square kernel. Odd, in `[1, MAX_KERNEL_SIZE]`. Default 5.
    pub kernel_size: usize,
}

impl Default for SmoothFilterConfig {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

impl SmoothFilterConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        check_odd_kernel(self.kernel_size)
    }
}

/// Parameters of the linear contrast stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastStretchConfig {
    /// Lowest output value. Default 0.
    pub min_out: u8,
    /// Highest output value, strictly greater than `min_out`. Default 255.
    pub max_out: u8,
}

impl Default for ContrastStretchConfig {
    fn default() -> Self {
        Self {
            min_out: 0,
            max_out: 255,
        }
    }
}

impl ContrastStretchConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.min_out >= self.max_out {
            return Err(ImageError::InvalidOutputRange(self.min_out, self.max_out));
        }
        Ok(())
    }
}

/// Parameters of the percentile based contrast spreading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastSpreadConfig {
    /// Percentage of pixels clipped at each end of the histogram, in `[0, 50)`. Default 5.
    pub percentage: f64,
}

impl Default for ContrastSpreadConfig {
    fn default() -> Self {
        Self { percentage: 5.0 }
    }
}

impl ContrastSpreadConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        if !(0.0..50.0).contains(&self.percentage) {
            return Err(ImageError::InvalidPercentage(self.percentage));
        }
        Ok(())
    }
}

/// Parameters of the block local threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalThresholdConfig {
    /// Side of the square tiles, in `[1, MAX_BLOCK_SIZE]`. Default 16.
    pub block_size: usize,
    /// Constant subtracted from the tile mean. Default 5.
    pub c: i32,
}

impl Default for LocalThresholdConfig {
    fn default() -> Self {
        Self {
            block_size: 16,
            c: 5,
        }
    }
}

impl LocalThresholdConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(ImageError::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }
}

/// Parameters of the pixel adaptive local threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveThresholdConfig {
    /// Side of the square window, in `[1, MAX_WINDOW_SIZE]`. Even values are bumped to the next odd value. Default 51.
    pub window_size: usize,
    /// Constant subtracted from the window mean. Default 10.
    pub c: i32,
}

impl Default for AdaptiveThresholdConfig {
    fn default() -> Self {
        Self {
            window_size: 51,
            c: 10,
        }
    }
}

impl AdaptiveThresholdConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(ImageError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }

    /// The window size actually used, always odd.
    pub fn effective_window_size(&self) -> usize {
        if self.window_size % 2 == 0 {
            self.window_size + 1
        } else {
            self.window_size
        }
    }
}

/// Parameters of binary dilation and erosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyConfig {
    /// Side of the square structuring element. Odd, in `[1, MAX_KERNEL_SIZE]`. Default 3.
    pub kernel_size: usize,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl MorphologyConfig {
    /// Check the parameter ranges.
    pub fn validate(&self) -> Result<(), ImageError> {
        check_odd_kernel(self.kernel_size)
    }
}
