//! Equal-ranges counting aggregate.
//!
//! `count_equal_ranges(col)` counts the maximal contiguous runs of adjacent
//! equal values in an ordered column, per aggregation group: `[1,1,2,2,1,1]`
//! has three runs. The engine may split a group's rows across parallel
//! workers, each feeding its own [`EqualRangesState`], and later merge the
//! partial states in sequence order; merging reproduces the sequential count
//! for any contiguous partitioning of the input.
//!
//! [`CountEqualRanges`] is the function adapter: it binds the declared
//! argument type at construction, resolves the equality comparator once,
//! and bridges Arrow arrays to the state's transitions. [`grouped`] holds
//! the batch driver that routes rows to per-group states.

pub mod grouped;
pub mod state;

pub use grouped::GroupedEqualRanges;
pub use state::EqualRangesState;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{DataType, Field};

use quarry_result::{Error, Result};
use quarry_types::{EqComparator, Value};

/// The `count_equal_ranges` aggregate function, bound to one argument type.
///
/// Holds no per-group state of its own; it owns the declared argument type
/// and the equality comparator resolved from it, and drives
/// [`EqualRangesState`] instances the engine allocates per group.
#[derive(Debug)]
pub struct CountEqualRanges {
    data_type: DataType,
    comparator: EqComparator,
}

impl CountEqualRanges {
    /// Construct from the argument type list supplied by the planner.
    ///
    /// Fails immediately (never deferred into row processing) when the list
    /// is not exactly one type, or when the single type has no defined
    /// equality comparison.
    pub fn try_new(argument_types: &[DataType]) -> Result<Self> {
        let data_type = match argument_types {
            [single] => single.clone(),
            other => {
                return Err(Error::InvalidArgumentError(format!(
                    "count_equal_ranges takes exactly one argument, got {}",
                    other.len()
                )));
            }
        };
        let comparator = EqComparator::for_data_type(&data_type)?;
        Ok(Self {
            data_type,
            comparator,
        })
    }

    /// The declared argument type.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// A fresh empty state for a newly observed group.
    pub fn create_state(&self) -> EqualRangesState {
        EqualRangesState::new()
    }

    /// Feed one array slot into `state`.
    ///
    /// Null slots are skipped: null policy is resolved upstream, so the
    /// state only ever absorbs concrete values. A column of the wrong type
    /// is rejected rather than absorbed; every value would compare unequal
    /// under the configured comparator and the count would be silently
    /// wrong.
    pub fn update_row(&self, state: &mut EqualRangesState, array: &ArrayRef, row: usize) -> Result<()> {
        self.check_input_type(array)?;
        if array.is_null(row) {
            return Ok(());
        }
        let value = Value::from_array(array, row)?;
        state.update(&self.comparator, value);
        Ok(())
    }

    /// Feed every valid slot of `array` into `state`, in row order.
    pub fn update_batch(&self, state: &mut EqualRangesState, array: &ArrayRef) -> Result<()> {
        self.check_input_type(array)?;
        for row in 0..array.len() {
            if array.is_null(row) {
                continue;
            }
            let value = Value::from_array(array, row)?;
            state.update(&self.comparator, value);
        }
        Ok(())
    }

    fn check_input_type(&self, array: &ArrayRef) -> Result<()> {
        if array.data_type() != self.data_type() {
            return Err(Error::InvalidArgumentError(format!(
                "count_equal_ranges configured for {:?} but input column is {:?}",
                self.data_type(),
                array.data_type()
            )));
        }
        Ok(())
    }

    /// Merge `other` into `state`, where `other` covers the rows that
    /// immediately follow `state`'s rows in the group's sequence order.
    pub fn merge(&self, state: &mut EqualRangesState, other: &EqualRangesState) {
        state.merge(&self.comparator, other);
    }

    /// Append `state`'s wire representation to `out`.
    pub fn serialize(&self, state: &EqualRangesState, out: &mut Vec<u8>) -> Result<()> {
        state.serialize_into(&self.data_type, out)
    }

    /// Reconstruct a state from the front of `src`, advancing the cursor.
    pub fn deserialize(&self, src: &mut &[u8]) -> Result<EqualRangesState> {
        EqualRangesState::deserialize_from(&self.data_type, src)
    }

    /// Extract the scalar result.
    pub fn finalize(&self, state: &EqualRangesState) -> u64 {
        state.finalize()
    }

    /// Result column metadata: the count is always present, even for empty
    /// groups (where it is zero), so the field is non-nullable.
    pub fn output_field(&self, alias: &str) -> Field {
        Field::new(alias, DataType::UInt64, false)
    }
}
