//! The ZX7 compression pipeline: dense-table optimal parser and emitter.

mod compressor;
mod emit;
mod optimize;

pub use compressor::Zx7Compressor;

use crate::error::CompressError;
use crate::CompressionResult;

/// Maximum back-reference length ZX7 considers (`len` range is `2..=MAX_LEN`).
pub(crate) const MAX_LEN: usize = 65536;

/// Compress `input` with ZX7 using the default configuration (no skip).
///
/// Shortcut for `Zx7Compressor::new().compress(input)`.
pub fn compress(input: &[u8]) -> Result<CompressionResult, CompressError> {
    Zx7Compressor::new().compress(input)
}
