//! The per-group accumulator for equal-ranges counting.
//!
//! One `EqualRangesState` exists per aggregation group. Memory is O(1)
//! regardless of row count: two owned value copies and a counter. The state
//! is a flat value type with no self-references, so the engine can place it
//! in arena storage and move it freely.

use arrow::datatypes::DataType;

use quarry_result::{Error, Result};
use quarry_types::codec::{self, DecodeError};
use quarry_types::{EqComparator, Value};

const STATE_EMPTY: u8 = 0;
const STATE_PRESENT: u8 = 1;

/// Counts maximal contiguous runs of adjacent equal values.
///
/// The state never stores its comparator; equality is handed in on every
/// transition so the state stays flat and relocatable. Mutation goes through
/// [`update`](Self::update) and [`merge`](Self::merge) only.
#[derive(Debug, Clone, Default)]
pub struct EqualRangesState {
    seen: Option<SeenBounds>,
    range_count: u64,
}

/// First and last absorbed value. Only present once a row has been fed;
/// `first` never changes afterwards, `last` tracks the most recent row.
#[derive(Debug, Clone)]
struct SeenBounds {
    first: Value,
    last: Value,
}

impl EqualRangesState {
    /// A fresh, empty state: no values absorbed, zero ranges.
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first `update` (or a merge with a non-empty state).
    pub fn is_empty(&self) -> bool {
        self.seen.is_none()
    }

    /// Absorb the next value of the group's ordered sequence.
    ///
    /// A value equal to the previous one extends the current run; an unequal
    /// value starts a new run. O(1) plus one equality comparison.
    pub fn update(&mut self, eq: &EqComparator, value: Value) {
        match &mut self.seen {
            None => {
                self.range_count = 1;
                self.seen = Some(SeenBounds {
                    first: value.clone(),
                    last: value,
                });
            }
            Some(bounds) => {
                if !eq.equals(&bounds.last, &value) {
                    self.range_count += 1;
                }
                bounds.last = value;
            }
        }
    }

    /// Absorb a partial state that follows `self` in sequence order.
    ///
    /// `self` becomes the concatenation "self then other"; direction matters,
    /// merge is not commutative. When `self`'s tail run and `other`'s head
    /// run carry equal values they are the same run counted twice, so one
    /// count is subtracted. For any contiguous partitioning of a sequence,
    /// merging the pieces in order reproduces the sequential count exactly,
    /// which is what makes distributed partial aggregation sound.
    pub fn merge(&mut self, eq: &EqComparator, other: &EqualRangesState) {
        let Some(other_bounds) = &other.seen else {
            return;
        };
        match &mut self.seen {
            None => {
                self.seen = other.seen.clone();
                self.range_count = other.range_count;
            }
            Some(bounds) => {
                let joined = eq.equals(&bounds.last, &other_bounds.first);
                self.range_count += other.range_count - u64::from(joined);
                bounds.last = other_bounds.last.clone();
            }
        }
    }

    /// The number of maximal equal-value runs absorbed so far.
    ///
    /// Pure read; 0 for a state that never saw a row.
    pub fn finalize(&self) -> u64 {
        self.range_count
    }

    /// Append the wire representation to `out`.
    ///
    /// Format: one flag byte, then (non-empty states only) `first` and
    /// `last` in the argument type's native encoding followed by the range
    /// count as little-endian u64. Empty states are a single byte; empty
    /// groups are common over sparse key spaces and should not pay for
    /// zero-filled fields.
    pub fn serialize_into(&self, data_type: &DataType, out: &mut Vec<u8>) -> Result<()> {
        match &self.seen {
            None => {
                out.push(STATE_EMPTY);
            }
            Some(bounds) => {
                out.push(STATE_PRESENT);
                encode(&bounds.first, data_type, out)?;
                encode(&bounds.last, data_type, out)?;
                out.extend_from_slice(&self.range_count.to_le_bytes());
            }
        }
        Ok(())
    }

    /// Reconstruct a state from the front of `src`, advancing the cursor.
    ///
    /// Inverse of [`serialize_into`](Self::serialize_into). Truncated or
    /// malformed input fails with [`Error::CorruptedState`]; a wrong count
    /// must never be produced silently.
    pub fn deserialize_from(data_type: &DataType, src: &mut &[u8]) -> Result<Self> {
        let flag = take_byte(src)?;
        match flag {
            STATE_EMPTY => Ok(Self::new()),
            STATE_PRESENT => {
                let first = decode(src, data_type)?;
                let last = decode(src, data_type)?;
                let range_count = take_u64(src)?;
                if range_count == 0 {
                    return Err(Error::CorruptedState(
                        "non-empty state with zero range count".into(),
                    ));
                }
                Ok(Self {
                    seen: Some(SeenBounds { first, last }),
                    range_count,
                })
            }
            other => Err(Error::CorruptedState(format!(
                "invalid state flag byte: {other}"
            ))),
        }
    }
}

fn encode(value: &Value, data_type: &DataType, out: &mut Vec<u8>) -> Result<()> {
    codec::encode_value(value, data_type, out)
        .map_err(|err| Error::Internal(format!("state value failed to encode: {err:?}")))
}

fn decode(src: &mut &[u8], data_type: &DataType) -> Result<Value> {
    codec::decode_value(src, data_type).map_err(|err| match err {
        DecodeError::NotEnoughData => Error::CorruptedState("truncated serialized state".into()),
        DecodeError::InvalidFormat => Error::CorruptedState("malformed serialized state".into()),
    })
}

fn take_byte(src: &mut &[u8]) -> Result<u8> {
    let Some((&byte, rest)) = src.split_first() else {
        return Err(Error::CorruptedState("truncated serialized state".into()));
    };
    *src = rest;
    Ok(byte)
}

fn take_u64(src: &mut &[u8]) -> Result<u64> {
    if src.len() < 8 {
        return Err(Error::CorruptedState("truncated serialized state".into()));
    }
    let (head, rest) = src.split_at(8);
    *src = rest;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(head);
    Ok(u64::from_le_bytes(bytes))
}
