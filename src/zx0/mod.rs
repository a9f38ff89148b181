//! The ZX0 compression pipeline: optimal parser, arena/recycler, and emitter.

mod arena;
mod compressor;
mod emit;
mod optimize;

pub use compressor::Compressor;

use crate::error::CompressError;
use crate::CompressionResult;

/// Compress `input` with ZX0 using the default configuration (no skip, inverted
/// new-offset Elias-gamma fields, forward mode).
///
/// Shortcut for `Compressor::new().compress(input)`.
pub fn compress(input: &[u8]) -> Result<CompressionResult, CompressError> {
    Compressor::new().compress(input)
}
