//! Value-layer types consumed by the aggregate core.
//!
//! This crate supplies the three capabilities the accumulator needs from the
//! column type system without owning the type system itself:
//!
//! - [`Value`]: an owned scalar copy of one array slot, safe to hold across
//!   batch boundaries;
//! - [`EqComparator`]: the equality test for the declared argument type,
//!   resolved once at function construction time;
//! - [`codec`]: the native binary encoding used when partial aggregate
//!   states travel between execution stages or machines.

pub mod codec;
pub mod eq;
pub mod value;

pub use eq::EqComparator;
pub use value::Value;

/// Identifier for one aggregation group within a grouped aggregation.
///
/// Group ids are assigned by the engine's grouping layer; this crate only
/// routes rows by them.
pub type GroupId = u64;
