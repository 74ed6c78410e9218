mod gray;
mod ycrcb;

pub use gray::{gray_from_rgb, rgb_from_gray, GrayConvert, RgbConvert};
pub use ycrcb::{rgb_from_ycrcb, ycrcb_from_rgb};
