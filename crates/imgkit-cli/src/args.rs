use std::path::PathBuf;

use argh::FromArgs;

#[derive(FromArgs)]
/// Apply a classical image processing operator to an image file
pub struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    pub input: PathBuf,

    /// path to the output image, not needed by `histogram`
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,

    /// path to a JSON file with the operator configuration
    #[argh(option)]
    pub config: Option<PathBuf>,

    #[argh(subcommand)]
    pub command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Mean(MeanArgs),
    Median(MedianArgs),
    Edges(EdgesArgs),
    Sharpen(SharpenArgs),
    Smooth(SmoothArgs),
    Equalize(EqualizeArgs),
    Stretch(StretchArgs),
    Spread(SpreadArgs),
    Rotate(RotateArgs),
    Flip(FlipArgs),
    Threshold(ThresholdArgs),
    Otsu(OtsuArgs),
    Kapur(KapurArgs),
    LocalThreshold(LocalThresholdArgs),
    AdaptiveThreshold(AdaptiveThresholdArgs),
    Dilate(DilateArgs),
    Erode(ErodeArgs),
    Centroid(CentroidArgs),
    Skeleton(SkeletonArgs),
    Histogram(HistogramArgs),
}

#[derive(FromArgs)]
/// blur with a mean (box) filter
#[argh(subcommand, name = "mean")]
pub struct MeanArgs {
    /// odd kernel size (default: 3)
    #[argh(option, short = 'k')]
    pub kernel_size: Option<usize>,
}

#[derive(FromArgs)]
/// denoise with a median filter
#[argh(subcommand, name = "median")]
pub struct MedianArgs {
    /// odd kernel size (default: 3)
    #[argh(option, short = 'k')]
    pub kernel_size: Option<usize>,
}

#[derive(FromArgs)]
/// sobel gradient magnitude scaled to [0, 255]
#[argh(subcommand, name = "edges")]
pub struct EdgesArgs {}

#[derive(FromArgs)]
/// sharpen with a 3x3 kernel
#[argh(subcommand, name = "sharpen")]
pub struct SharpenArgs {}

#[derive(FromArgs)]
/// smooth with a normalized gaussian-like kernel
#[argh(subcommand, name = "smooth")]
pub struct SmoothArgs {
    /// odd kernel size (default: 5)
    #[argh(option, short = 'k')]
    pub kernel_size: Option<usize>,
}

#[derive(FromArgs)]
/// equalize the histogram, the luma only for color images
#[argh(subcommand, name = "equalize")]
pub struct EqualizeArgs {}

#[derive(FromArgs)]
/// linearly stretch every channel to an output range
#[argh(subcommand, name = "stretch")]
pub struct StretchArgs {
    /// lowest output value (default: 0)
    #[argh(option)]
    pub min_out: Option<u8>,

    /// highest output value (default: 255)
    #[argh(option)]
    pub max_out: Option<u8>,
}

#[derive(FromArgs)]
/// spread the contrast after clipping the histogram tails
#[argh(subcommand, name = "spread")]
pub struct SpreadArgs {
    /// percentage clipped at each end, in [0, 50) (default: 5)
    #[argh(option, short = 'p')]
    pub percentage: Option<f64>,
}

#[derive(FromArgs)]
/// rotate counterclockwise by 90, 180 or 270 degrees
#[argh(subcommand, name = "rotate")]
pub struct RotateArgs {
    /// rotation angle in degrees
    #[argh(option, short = 'a')]
    pub angle: i32,
}

#[derive(FromArgs)]
/// mirror the image
#[argh(subcommand, name = "flip")]
pub struct FlipArgs {
    /// horizontal or vertical (default: horizontal)
    #[argh(option, short = 'm', default = "String::from(\"horizontal\")")]
    pub mode: String,
}

#[derive(FromArgs)]
/// threshold with a fixed value
#[argh(subcommand, name = "threshold")]
pub struct ThresholdArgs {
    /// pixels above this value become 255 (default: 127)
    #[argh(option, short = 't', default = "127")]
    pub threshold: u8,
}

#[derive(FromArgs)]
/// threshold with the Otsu method
#[argh(subcommand, name = "otsu")]
pub struct OtsuArgs {}

#[derive(FromArgs)]
/// threshold with the Kapur maximum entropy method
#[argh(subcommand, name = "kapur")]
pub struct KapurArgs {}

#[derive(FromArgs)]
/// threshold every tile against its mean
#[argh(subcommand, name = "local-threshold")]
pub struct LocalThresholdArgs {
    /// tile side in pixels (default: 16)
    #[argh(option, short = 'b')]
    pub block_size: Option<usize>,

    /// constant subtracted from the tile mean (default: 5)
    #[argh(option, short = 'c')]
    pub c: Option<i32>,
}

#[derive(FromArgs)]
/// threshold every pixel against the mean of its window
#[argh(subcommand, name = "adaptive-threshold")]
pub struct AdaptiveThresholdArgs {
    /// window side in pixels, even values are bumped (default: 51)
    #[argh(option, short = 'w')]
    pub window_size: Option<usize>,

    /// constant subtracted from the window mean (default: 10)
    #[argh(option, short = 'c')]
    pub c: Option<i32>,
}

#[derive(FromArgs)]
/// binary dilation with a square structuring element
#[argh(subcommand, name = "dilate")]
pub struct DilateArgs {
    /// odd kernel size (default: 3)
    #[argh(option, short = 'k')]
    pub kernel_size: Option<usize>,
}

#[derive(FromArgs)]
/// binary erosion with a square structuring element
#[argh(subcommand, name = "erode")]
pub struct ErodeArgs {
    /// odd kernel size (default: 3)
    #[argh(option, short = 'k')]
    pub kernel_size: Option<usize>,
}

#[derive(FromArgs)]
/// compute the foreground center of mass and mark it in red
#[argh(subcommand, name = "centroid")]
pub struct CentroidArgs {}

#[derive(FromArgs)]
/// reduce the foreground to a one pixel wide skeleton
#[argh(subcommand, name = "skeleton")]
pub struct SkeletonArgs {}

#[derive(FromArgs)]
/// print the per-channel histograms as JSON
#[argh(subcommand, name = "histogram")]
pub struct HistogramArgs {}

impl Command {
    /// The subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Mean(_) => "mean",
            Command::Median(_) => "median",
            Command::Edges(_) => "edges",
            Command::Sharpen(_) => "sharpen",
            Command::Smooth(_) => "smooth",
            Command::Equalize(_) => "equalize",
            Command::Stretch(_) => "stretch",
            Command::Spread(_) => "spread",
            Command::Rotate(_) => "rotate",
            Command::Flip(_) => "flip",
            Command::Threshold(_) => "threshold",
            Command::Otsu(_) => "otsu",
            Command::Kapur(_) => "kapur",
            Command::LocalThreshold(_) => "local-threshold",
            Command::AdaptiveThreshold(_) => "adaptive-threshold",
            Command::Dilate(_) => "dilate",
            Command::Erode(_) => "erode",
            Command::Centroid(_) => "centroid",
            Command::Skeleton(_) => "skeleton",
            Command::Histogram(_) => "histogram",
        }
    }
}
