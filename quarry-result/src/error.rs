use thiserror::Error;

/// Unified error type for the quarry aggregate stack.
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// At the engine boundary they are typically converted to user-facing
/// messages; internal code can match on specific variants.
///
/// # Thread Safety
///
/// `Error` is `Send + Sync` so failures can cross worker-thread boundaries
/// during parallel partial aggregation.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow library error during columnar data operations.
    ///
    /// Raised when building result arrays or record batches, or when an
    /// input array cannot be interpreted as its declared type. Arrow is the
    /// columnar memory format all input columns arrive in, so these errors
    /// indicate a format incompatibility between the engine and this
    /// component.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid user input or API parameter.
    ///
    /// Raised at function construction time for a wrong argument count or
    /// an argument type with no defined equality, and at batch time when an
    /// input column's type does not match the configured argument type.
    ///
    /// # Recovery
    ///
    /// Construction-time instances are reported to the caller immediately
    /// and never deferred into row processing. Batch-time instances signal
    /// an engine contract violation.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// A serialized partial aggregate state could not be decoded.
    ///
    /// Raised by state deserialization on truncated or malformed input.
    /// This is fatal for the affected state: producing a silently wrong
    /// count is never acceptable, so decoding fails fast and the engine
    /// decides whether to abort the query or re-fetch the partial state.
    #[error("corrupted aggregate state: {0}")]
    CorruptedState(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// Should never occur during normal operation; it means an internal
    /// invariant was violated (for example, a state value whose variant
    /// disagrees with the configured argument type).
    #[error("An internal operation failed: {0}")]
    Internal(String),
}
