//! The Equality Oracle: per-type equality resolved once at construction.
//!
//! The aggregate's merge rule is only sound if equality is a true
//! equivalence relation (reflexive, symmetric, transitive). Floats therefore
//! compare bitwise: IEEE `==` is not reflexive for NaN, and a NaN-carrying
//! state must still merge consistently with itself after a serialization
//! round-trip.

use arrow::datatypes::DataType;

use quarry_result::{Error, Result};

use crate::Value;

type EqFn = fn(&Value, &Value) -> bool;

/// Equality test bound to one declared argument type.
///
/// The dispatch happens once, here, instead of per comparison: the resolved
/// function pointer is stored in the function adapter and handed to the
/// state on every `update`/`merge` call. The state itself never stores it,
/// so states stay flat and freely relocatable.
#[derive(Debug, Clone, Copy)]
pub struct EqComparator {
    eq: EqFn,
}

macro_rules! eq_variant {
    ($name:ident, $variant:ident) => {
        fn $name(a: &Value, b: &Value) -> bool {
            matches!((a, b), (Value::$variant(x), Value::$variant(y)) if x == y)
        }
    };
}

eq_variant!(eq_int8, Int8);
eq_variant!(eq_int16, Int16);
eq_variant!(eq_int32, Int32);
eq_variant!(eq_int64, Int64);
eq_variant!(eq_uint8, UInt8);
eq_variant!(eq_uint16, UInt16);
eq_variant!(eq_uint32, UInt32);
eq_variant!(eq_uint64, UInt64);
eq_variant!(eq_boolean, Boolean);
eq_variant!(eq_utf8, Utf8);
eq_variant!(eq_binary, Binary);
eq_variant!(eq_date32, Date32);
eq_variant!(eq_decimal128, Decimal128);

fn eq_float32(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Float32(x), Value::Float32(y)) if x.to_bits() == y.to_bits())
}

fn eq_float64(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Float64(x), Value::Float64(y)) if x.to_bits() == y.to_bits())
}

impl EqComparator {
    /// Resolve the comparator for `data_type`.
    ///
    /// Fails with [`Error::InvalidArgumentError`] when the type has no
    /// defined equality; the function adapter surfaces this at construction
    /// time, never during row processing.
    pub fn for_data_type(data_type: &DataType) -> Result<Self> {
        let eq: EqFn = match data_type {
            DataType::Int8 => eq_int8,
            DataType::Int16 => eq_int16,
            DataType::Int32 => eq_int32,
            DataType::Int64 => eq_int64,
            DataType::UInt8 => eq_uint8,
            DataType::UInt16 => eq_uint16,
            DataType::UInt32 => eq_uint32,
            DataType::UInt64 => eq_uint64,
            DataType::Float32 => eq_float32,
            DataType::Float64 => eq_float64,
            DataType::Boolean => eq_boolean,
            DataType::Utf8 | DataType::LargeUtf8 => eq_utf8,
            DataType::Binary => eq_binary,
            DataType::Date32 => eq_date32,
            DataType::Decimal128(_, _) => eq_decimal128,
            other => {
                return Err(Error::InvalidArgumentError(format!(
                    "no equality comparison defined for type {other:?}"
                )));
            }
        };
        Ok(EqComparator { eq })
    }

    /// Test two values for equality.
    ///
    /// Values of a variant other than the resolved type compare unequal;
    /// that situation is an internal invariant violation, not a data
    /// condition, and cannot arise from well-typed input.
    #[inline]
    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        (self.eq)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_equality() {
        let eq = EqComparator::for_data_type(&DataType::Int64).unwrap();
        assert!(eq.equals(&Value::Int64(7), &Value::Int64(7)));
        assert!(!eq.equals(&Value::Int64(7), &Value::Int64(8)));
    }

    #[test]
    fn nan_is_reflexive() {
        let eq = EqComparator::for_data_type(&DataType::Float64).unwrap();
        assert!(eq.equals(&Value::Float64(f64::NAN), &Value::Float64(f64::NAN)));
        assert!(!eq.equals(&Value::Float64(0.0), &Value::Float64(-0.0)));
    }

    #[test]
    fn nested_types_have_no_comparator() {
        use arrow::datatypes::Field;
        use std::sync::Arc;

        let list = DataType::List(Arc::new(Field::new("item", DataType::Int32, true)));
        assert!(EqComparator::for_data_type(&list).is_err());
    }
}
