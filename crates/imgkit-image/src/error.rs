/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}, {1}), expected ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the image has zero width or height.
    #[error("Image must have a non-zero size, got width {0} and height {1}")]
    EmptyImage(usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds {1}")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinate ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the number of channel images to merge is wrong.
    #[error("Expected {1} channel images to merge, got {0}")]
    InvalidChannelCount(usize, usize),

    /// Error when a kernel or neighborhood size is not an odd number in the supported range.
    #[error("Kernel size must be an odd number between 1 and 101, got {0}")]
    InvalidKernelSize(usize),

    /// Error when the rotation angle is not a multiple of 90 degrees.
    #[error("Rotation angle must be one of 90, 180 or 270 degrees, got {0}")]
    InvalidRotationAngle(i32),

    /// Error when the flip mode is not recognized.
    #[error("Flip mode must be 'horizontal' or 'vertical', got '{0}'")]
    InvalidFlipMode(String),

    /// Error when the output range of a contrast stretch is empty.
    #[error("Output range minimum ({0}) must be smaller than the maximum ({1})")]
    InvalidOutputRange(u8, u8),

    /// Error when the clipping percentage is out of range.
    #[error("Percentage must be in [0, 50), got {0}")]
    InvalidPercentage(f64),

    /// Error when the block size of a local threshold is out of range.
    #[error("Block size must be between 1 and 64, got {0}")]
    InvalidBlockSize(usize),

    /// Error when the window size of an adaptive threshold is out of range.
    #[error("Window size must be between 1 and 101, got {0}")]
    InvalidWindowSize(usize),
}
