use crate::Error;

/// Convenience alias used across all quarry crates.
///
/// Equivalent to `std::result::Result<T, quarry_result::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
