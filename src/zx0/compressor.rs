use crate::error::CompressError;
use crate::zx0::emit::emit;
use crate::zx0::optimize::{optimize, ProgressCallback};
use crate::{CompressionResult, MAX_OFFSET_ZX0, MAX_OFFSET_ZX7};

/// Configures and runs a ZX0 compression operation using the builder pattern.
///
/// By calling [`Compressor::new`] a new [`Compressor`] is instantiated using the
/// following default values:
///
/// - No prefix/suffix skipping
/// - Quick mode disabled
/// - Backwards mode disabled
/// - Classic mode disabled
///
/// The [`Compressor`] holds only configuration, so it can be reused for several
/// [`compress`](Compressor::compress) calls, including from different threads,
/// without synchronization.
pub struct Compressor<'a> {
    skip: usize,
    quick_mode: bool,
    backwards_mode: bool,
    classic_mode: bool,
    offset_limit: Option<usize>,
    progress_callback: Box<ProgressCallback<'a>>,
}

impl<'a> Compressor<'a> {
    /// Instantiate a new [`Compressor`] with ZX0's default configuration.
    pub fn new() -> Self {
        Self {
            skip: 0,
            quick_mode: false,
            backwards_mode: false,
            classic_mode: false,
            offset_limit: None,
            progress_callback: Box::new(|_| ()),
        }
    }

    /// When enabled, restricts the back-reference search to ZX7's smaller
    /// offset ceiling, trading compression ratio for a faster search over
    /// large inputs. Overridden by an explicit [`Compressor::offset_limit`].
    pub fn quick_mode(&mut self, quick_mode: bool) -> &mut Self {
        self.quick_mode = quick_mode;
        self
    }

    /// Override the back-reference search ceiling directly, instead of
    /// picking between ZX0's and ZX7's defaults via [`Compressor::quick_mode`].
    /// Takes precedence over `quick_mode` when set.
    pub fn offset_limit(&mut self, offset_limit: usize) -> &mut Self {
        self.offset_limit = Some(offset_limit);
        self
    }

    /// When enabled, produces a stream meant to be decompressed tail-first
    /// (high to low addresses).
    pub fn backwards_mode(&mut self, backwards_mode: bool) -> &mut Self {
        self.backwards_mode = backwards_mode;
        self
    }

    /// When enabled, produces the legacy V1 file format (no inverted
    /// new-offset Elias-gamma data bits).
    pub fn classic_mode(&mut self, classic_mode: bool) -> &mut Self {
        self.classic_mode = classic_mode;
        self
    }

    /// Register a progress callback, invoked repeatedly during optimization
    /// with a ratio in `0.0..=1.0`.
    pub fn progress_callback<C: FnMut(f32) + 'a>(&mut self, progress_callback: C) -> &mut Self {
        self.progress_callback = Box::new(progress_callback);
        self
    }

    /// Number of prefix bytes to treat as already-present decompression
    /// context: matchable, but not themselves encoded.
    pub fn skip(&mut self, skip: usize) -> &mut Self {
        self.skip = skip;
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
        assert!(!input.is_empty(), "zx0: input must not be empty");
        assert!(self.skip < input.len(), "zx0: skip must be less than input length");

        let offset_limit = self
            .offset_limit
            .unwrap_or(if self.quick_mode { MAX_OFFSET_ZX7 } else { MAX_OFFSET_ZX0 });

        let (allocator, tail_index) = optimize(input, self.skip, offset_limit, &mut *self.progress_callback)?;

        let invert_mode = !self.classic_mode && !self.backwards_mode;
        let (output, delta) = emit(&allocator, tail_index, input, self.skip, self.backwards_mode, invert_mode);

        log::debug!(
            "zx0 compress: {} byte(s) -> {} byte(s), delta={delta}",
            input.len(),
            output.len()
        );

        Ok(CompressionResult { output, delta })
    }
}

impl<'a> Default for Compressor<'a> {
    fn default() -> Self {
        Self::new()
    }
}
