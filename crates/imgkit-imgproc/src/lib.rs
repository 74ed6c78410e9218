#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// shape analysis module: centroid and skeleton.
pub mod analysis;

/// color transformations module.
pub mod color;

/// operator configuration module.
pub mod config;

/// utilities to draw on images.
pub mod draw;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// image flipping module.
pub mod flip;

/// compute image histogram module.
pub mod histogram;

/// binary morphology module.
pub mod morphology;

/// module containing parallization utilities.
pub mod parallel;

/// image border padding module.
pub mod padding;

/// image rotation module.
pub mod rotate;

/// operations to threshold images.
pub mod threshold;
