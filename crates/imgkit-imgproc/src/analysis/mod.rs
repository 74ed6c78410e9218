mod centroid;
pub use centroid::{centroid, mark_centroid, Centroid, MARKER_COLOR, MARKER_RADIUS};

mod skeleton;
pub use skeleton::{skeletonize, skeletonize_with, Thinning, ZhangSuen, SKELETON_THRESHOLD};
