//! Error types and result definitions for the quarry aggregate crates.
//!
//! A single unified error type ([`Error`]) and result alias ([`Result<T>`])
//! are shared by every crate in the workspace. All operations that can fail
//! return `Result<T>` and propagate with the `?` operator; callers that care
//! about a specific failure mode match on the variant.
//!
//! # Error Categories
//!
//! - **Data format errors** ([`Error::Arrow`]): Arrow array/batch construction
//!   and downcast failures.
//! - **User input errors** ([`Error::InvalidArgumentError`]): bad function
//!   arguments, unsupported argument types, mismatched input columns.
//! - **Corrupted state** ([`Error::CorruptedState`]): a serialized partial
//!   aggregate state that cannot be decoded. Fatal for that state.
//! - **Internal errors** ([`Error::Internal`]): violated invariants; bugs.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
