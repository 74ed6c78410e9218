use std::path::Path;

use image::{ColorType, ImageFormat};
use imgkit_image::{Image, ImageSize};

use crate::error::IoError;

/// Formats the codec reads and writes.
const SUPPORTED_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// An 8-bit image whose channel count is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DynImage {
    /// 8-bit grayscale image
    Gray(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb(Image<u8, 3>),
}

impl DynImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DynImage::Gray(img) => img.size(),
            DynImage::Rgb(img) => img.size(),
        }
    }

    /// The number of channels, 1 or 3.
    pub fn num_channels(&self) -> usize {
        match self {
            DynImage::Gray(img) => img.num_channels(),
            DynImage::Rgb(img) => img.num_channels(),
        }
    }
}

impl From<Image<u8, 1>> for DynImage {
    fn from(img: Image<u8, 1>) -> Self {
        DynImage::Gray(img)
    }
}

impl From<Image<u8, 3>> for DynImage {
    fn from(img: Image<u8, 3>) -> Self {
        DynImage::Rgb(img)
    }
}

fn image_format(file_path: &Path) -> Result<ImageFormat, IoError> {
    ImageFormat::from_path(file_path)
        .ok()
        .filter(|format| SUPPORTED_FORMATS.contains(format))
        .ok_or_else(|| IoError::InvalidFileExtension(file_path.to_path_buf()))
}

fn decode(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let format = image_format(file_path)?;
    let reader = std::io::BufReader::new(std::fs::File::open(file_path)?);
    Ok(image::load(reader, format)?)
}

fn size_of(img: &image::DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

/// Reads an image from the given file path.
///
/// The format is chosen from the file extension. Images without color
/// information decode to [`DynImage::Gray`], every other image to
/// [`DynImage::Rgb`]. Alpha channels are dropped and 16-bit or float samples
/// are scaled to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Errors
///
/// [`IoError::FileDoesNotExist`] if nothing exists at the path,
/// [`IoError::InvalidFileExtension`] for an unsupported extension and
/// [`IoError::ImageCodecError`] when the content cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DynImage, IoError> {
    let file_path = file_path.as_ref();
    let img = decode(file_path)?;
    let size = size_of(&img);

    let color = img.color();
    log::debug!("decoded {} as {:?} {}", file_path.display(), color, size);

    let image = if color.has_color() {
        DynImage::Rgb(Image::new(size, img.into_rgb8().into_raw())?)
    } else {
        DynImage::Gray(Image::new(size, img.into_luma8().into_raw())?)
    };

    Ok(image)
}

/// Reads an image from the given file path as RGB8.
///
/// Grayscale files are expanded to three equal channels.
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = decode(file_path.as_ref())?;
    let size = size_of(&img);
    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads an image from the given file path as 8-bit grayscale.
///
/// Color files are converted with the luma weights of the codec.
pub fn read_image_gray8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode(file_path.as_ref())?;
    let size = size_of(&img);
    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

fn encode(
    file_path: &Path,
    data: &[u8],
    size: ImageSize,
    color: ColorType,
) -> Result<(), IoError> {
    let format = image_format(file_path)?;
    image::save_buffer_with_format(
        file_path,
        data,
        size.width as u32,
        size.height as u32,
        color,
        format,
    )?;
    Ok(())
}

/// Writes an image to the given file path.
///
/// The format is chosen from the file extension.
///
/// # Arguments
///
/// * `file_path` - The destination path, with one of the png, jpg, jpeg, bmp,
///   tif, tiff, gif or webp extensions.
/// * `image` - The image to write.
pub fn write_image(file_path: impl AsRef<Path>, image: &DynImage) -> Result<(), IoError> {
    match image {
        DynImage::Gray(img) => write_image_gray8(file_path, img),
        DynImage::Rgb(img) => write_image_rgb8(file_path, img),
    }
}

/// Writes a grayscale image to the given file path.
///
/// GIF files have no luma mode and are written as RGB with three equal channels.
pub fn write_image_gray8(file_path: impl AsRef<Path>, image: &Image<u8, 1>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    if image_format(file_path)? == ImageFormat::Gif {
        let rgb = image
            .as_slice()
            .iter()
            .flat_map(|&v| [v, v, v])
            .collect::<Vec<u8>>();
        return encode(file_path, &rgb, image.size(), ColorType::Rgb8);
    }
    encode(file_path, image.as_slice(), image.size(), ColorType::L8)
}

/// Writes an RGB8 image to the given file path.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    encode(file_path.as_ref(), image.as_slice(), image.size(), ColorType::Rgb8)
}
