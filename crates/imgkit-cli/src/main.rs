mod args;
mod config;

use std::path::Path;

use imgkit::imgproc::{
    analysis,
    config::{
        AdaptiveThresholdConfig, ContrastSpreadConfig, ContrastStretchConfig,
        LocalThresholdConfig, MeanFilterConfig, MedianFilterConfig, MorphologyConfig,
        SmoothFilterConfig,
    },
    enhance, filter, flip, histogram, morphology, rotate, threshold,
};
use imgkit::io::{functional as F, DynImage};

use crate::args::{Args, Command};
use crate::config::load_config;

/// Apply an operator generic over the channel count, keeping the variant.
macro_rules! map_dyn {
    ($image:expr, |$img:ident| $op:expr) => {
        match $image {
            DynImage::Gray($img) => DynImage::Gray($op),
            DynImage::Rgb($img) => DynImage::Rgb($op),
        }
    };
}

/// Apply an operator accepting gray or color input and producing one image type.
macro_rules! any_dyn {
    ($image:expr, |$img:ident| $op:expr) => {
        match $image {
            DynImage::Gray($img) => $op,
            DynImage::Rgb($img) => $op,
        }
    };
}

fn apply(
    command: &Command,
    image: &DynImage,
    config_path: Option<&Path>,
) -> Result<Option<DynImage>, Box<dyn std::error::Error>> {
    let output = match command {
        Command::Mean(a) => {
            let mut config: MeanFilterConfig = load_config(config_path)?;
            if let Some(k) = a.kernel_size {
                config.kernel_size = k;
            }
            config.validate()?;
            map_dyn!(image, |img| filter::mean_filter(img, &config)?)
        }
        Command::Median(a) => {
            let mut config: MedianFilterConfig = load_config(config_path)?;
            if let Some(k) = a.kernel_size {
                config.kernel_size = k;
            }
            config.validate()?;
            map_dyn!(image, |img| filter::median_filter(img, &config)?)
        }
        Command::Edges(_) => {
            DynImage::Gray(any_dyn!(image, |img| filter::edge_detection(img)?))
        }
        Command::Sharpen(_) => map_dyn!(image, |img| filter::sharpen(img)?),
        Command::Smooth(a) => {
            let mut config: SmoothFilterConfig = load_config(config_path)?;
            if let Some(k) = a.kernel_size {
                config.kernel_size = k;
            }
            config.validate()?;
            map_dyn!(image, |img| filter::smooth(img, &config)?)
        }
        Command::Equalize(_) => match image {
            DynImage::Gray(img) => DynImage::Gray(enhance::equalize_histogram(img)?),
            DynImage::Rgb(img) => DynImage::Rgb(enhance::equalize_histogram_rgb(img)?),
        },
        Command::Stretch(a) => {
            let mut config: ContrastStretchConfig = load_config(config_path)?;
            if let Some(v) = a.min_out {
                config.min_out = v;
            }
            if let Some(v) = a.max_out {
                config.max_out = v;
            }
            config.validate()?;
            map_dyn!(image, |img| enhance::contrast_stretch(img, &config)?)
        }
        Command::Spread(a) => {
            let mut config: ContrastSpreadConfig = load_config(config_path)?;
            if let Some(p) = a.percentage {
                config.percentage = p;
            }
            config.validate()?;
            map_dyn!(image, |img| enhance::contrast_spread(img, &config)?)
        }
        Command::Rotate(a) => {
            let rotation = rotate::Rotation::try_from(a.angle)?;
            map_dyn!(image, |img| rotate::rotate(img, rotation)?)
        }
        Command::Flip(a) => {
            let mode: flip::FlipMode = a.mode.parse()?;
            map_dyn!(image, |img| flip::flip(img, mode)?)
        }
        Command::Threshold(a) => DynImage::Gray(any_dyn!(image, |img| {
            threshold::manual_threshold(img, a.threshold)?
        })),
        Command::Otsu(_) => DynImage::Gray(any_dyn!(image, |img| threshold::otsu_threshold(img)?)),
        Command::Kapur(_) => {
            DynImage::Gray(any_dyn!(image, |img| threshold::kapur_threshold(img)?))
        }
        Command::LocalThreshold(a) => {
            let mut config: LocalThresholdConfig = load_config(config_path)?;
            if let Some(b) = a.block_size {
                config.block_size = b;
            }
            if let Some(c) = a.c {
                config.c = c;
            }
            config.validate()?;
            DynImage::Gray(any_dyn!(image, |img| threshold::local_threshold(
                img, &config
            )?))
        }
        Command::AdaptiveThreshold(a) => {
            let mut config: AdaptiveThresholdConfig = load_config(config_path)?;
            if let Some(w) = a.window_size {
                config.window_size = w;
            }
            if let Some(c) = a.c {
                config.c = c;
            }
            config.validate()?;
            DynImage::Gray(any_dyn!(image, |img| threshold::adaptive_threshold(
                img, &config
            )?))
        }
        Command::Dilate(a) => {
            let mut config: MorphologyConfig = load_config(config_path)?;
            if let Some(k) = a.kernel_size {
                config.kernel_size = k;
            }
            config.validate()?;
            map_dyn!(image, |img| morphology::dilate(img, &config)?)
        }
        Command::Erode(a) => {
            let mut config: MorphologyConfig = load_config(config_path)?;
            if let Some(k) = a.kernel_size {
                config.kernel_size = k;
            }
            config.validate()?;
            map_dyn!(image, |img| morphology::erode(img, &config)?)
        }
        Command::Centroid(_) => {
            let centroid = any_dyn!(image, |img| analysis::centroid(img)?);
            match centroid {
                Some(c) => log::info!("centroid: x = {}, y = {}", c.x, c.y),
                None => log::info!("centroid: undefined, the image has no foreground"),
            }
            DynImage::Rgb(any_dyn!(image, |img| analysis::mark_centroid(img, centroid)?))
        }
        Command::Skeleton(_) => {
            DynImage::Gray(any_dyn!(image, |img| analysis::skeletonize(img)?))
        }
        Command::Histogram(_) => {
            let histograms: Vec<Vec<usize>> = match image {
                DynImage::Gray(img) => vec![histogram::compute_histogram(img).to_vec()],
                DynImage::Rgb(img) => histogram::compute_histograms(img)
                    .iter()
                    .map(|h| h.to_vec())
                    .collect(),
            };
            println!("{}", serde_json::to_string(&histograms)?);
            return Ok(None);
        }
    };

    Ok(Some(output))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let writes_image = !matches!(args.command, Command::Histogram(_));
    if writes_image && args.output.is_none() {
        return Err("an output path is required, pass -o <path>".into());
    }

    let image = F::read_image_any(&args.input)?;
    log::info!(
        "loaded {} ({}, {} channels)",
        args.input.display(),
        image.size(),
        image.num_channels()
    );

    log::info!("applying {}", args.command.name());
    if let Some(output) = apply(&args.command, &image, args.config.as_deref())? {
        let output_path = args
            .output
            .as_ref()
            .ok_or("an output path is required, pass -o <path>")?;
        F::write_image(output_path, &output)?;
        log::info!(
            "saved {} ({}, {} channels)",
            output_path.display(),
            output.size(),
            output.num_channels()
        );
    }

    Ok(())
}
