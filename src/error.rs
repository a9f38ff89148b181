//! Error type returned by the compression entry points.

/// Failure modes recognized by the core.
///
/// The core distinguishes only resource exhaustion as a recoverable, reportable
/// error. Precondition violations (empty input, `skip >= input.len()`) are caller
/// contract breaches and are enforced with assertions rather than surfaced here;
/// they are never expected to occur with a correctly-behaving caller.
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    /// The decision arena (ZX0) or dense optimization table (ZX7) could not grow
    /// to cover the input, either because the allocator itself failed or because
    /// the configured slab cap was exceeded.
    #[error("decision arena exhausted while optimizing {size} byte(s) of input")]
    ResourceExhausted {
        /// Size, in bytes, of the input that was being compressed.
        size: usize,
    },
}
