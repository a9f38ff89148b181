#![warn(missing_docs)]

//! Optimal-parsing ZX0 and ZX7 compressors for retrocomputing payloads.
//!
//! This crate implements the optimal parsers and bit-serial emitters for Einar
//! Saukas' ZX0 and ZX7 compression formats, both aimed at producing compact
//! payloads that tiny Z80 (and similar 8-bit) decompressors can unpack. Given an
//! input byte sequence, each format's optimizer finds, in polynomial time and
//! bounded memory, the minimum-bit-cost encoding under that format's cost
//! model, and the corresponding emitter serializes it.
//!
//! The crate does not include a decompressor: decompression is expected to run
//! on the target platform (a Z80 routine, for instance) and is out of scope
//! here, as is file I/O, CLI argument parsing, and multithreaded block
//! partitioning of large inputs — those are thin wrappers that belong to a
//! calling application, such as the `zx0x7` binary built alongside this
//! library.
//!
//! Both formats can be used in two ways:
//!
//! 1. Instantiate a [`Compressor`] or [`Zx7Compressor`], configure it, and
//!    invoke its `compress` method.
//! 2. Use the top-level [`zx0::compress`] or [`zx7::compress`] shortcut
//!    functions for default settings.
//!
//! Compressors hold only configuration (no shared mutable state persists
//! across calls), so they are `Send` and may be used to compress independent
//! inputs in parallel without synchronization.

mod bitstream;
mod error;

pub mod zx0;
pub mod zx7;

#[cfg(test)]
mod testing;

pub use error::CompressError;
pub use zx0::Compressor;
pub use zx7::Zx7Compressor;

const INITIAL_OFFSET: usize = 1;
const MAX_OFFSET_ZX0: usize = 32640;
const MAX_OFFSET_ZX7: usize = 2176;

/// The result of a compression operation.
pub struct CompressionResult {
    /// The compressed output bytes.
    pub output: Vec<u8>,

    /// The minimum gap that must be maintained between the compressed data's
    /// end address and the uncompressed data's end address when
    /// decompressing in place (or between the start addresses, under
    /// backwards mode).
    pub delta: usize,
}

/// Compress `input` with ZX0 using the default configuration.
///
/// Shortcut for [`zx0::compress`].
pub fn compress_zx0(input: &[u8]) -> Result<CompressionResult, CompressError> {
    zx0::compress(input)
}

/// Compress `input` with ZX7 using the default configuration.
///
/// Shortcut for [`zx7::compress`].
pub fn compress_zx7(input: &[u8]) -> Result<CompressionResult, CompressError> {
    zx7::compress(input)
}
