use crate::error::CompressError;
use crate::zx7::emit::emit;
use crate::zx7::optimize::{optimize, ProgressCallback};
use crate::{CompressionResult, MAX_OFFSET_ZX7};

/// Configures and runs a ZX7 compression operation using the builder pattern.
///
/// ZX7 has no repeat-offset concept or backwards/invert modes: its wire format
/// is a single, byte-aligned variant. The configuration surface is the skip
/// prefix and a progress callback, mirroring [`crate::zx0::Compressor`].
pub struct Zx7Compressor<'a> {
    skip: usize,
    progress_callback: Box<ProgressCallback<'a>>,
}

impl<'a> Zx7Compressor<'a> {
    /// Instantiate a new [`Zx7Compressor`] with no prefix skipping.
    pub fn new() -> Self {
        Self {
            skip: 0,
            progress_callback: Box::new(|_| ()),
        }
    }

    /// Number of prefix bytes to treat as already-present decompression
    /// context: matchable, but not themselves encoded.
    pub fn skip(&mut self, skip: usize) -> &mut Self {
        self.skip = skip;
        self
    }

    /// Register a progress callback, invoked repeatedly while the cost table
    /// is built with a ratio in `0.0..=1.0`.
    pub fn progress_callback<C: FnMut(f32) + 'a>(&mut self, progress_callback: C) -> &mut Self {
        self.progress_callback = Box::new(progress_callback);
        self
    }

    /// Compress `input`, returning the encoded bytes and the in-place
    /// decompression delta.
    ///
    /// # Panics
    ///
    /// Panics if `input` is empty or `skip >= input.len()`: these are caller
    /// contract breaches, not recoverable runtime conditions.
    pub fn compress(&mut self, input: &[u8]) -> Result<CompressionResult, CompressError> {
        assert!(!input.is_empty(), "zx7: input must not be empty");
        assert!(self.skip < input.len(), "zx7: skip must be less than input length");

        let table = optimize(input, self.skip, MAX_OFFSET_ZX7, &mut *self.progress_callback)?;
        let (output, delta) = emit(&table, input, self.skip);

        log::debug!(
            "zx7 compress: {} byte(s) -> {} byte(s), delta={delta}",
            input.len(),
            output.len()
        );

        Ok(CompressionResult { output, delta })
    }
}

impl<'a> Default for Zx7Compressor<'a> {
    fn default() -> Self {
        Self::new()
    }
}
