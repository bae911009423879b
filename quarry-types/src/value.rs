//! Owned scalar values extracted from Arrow arrays.
//!
//! The accumulator keeps copies of the first and last value it has absorbed,
//! so values extracted here must own their data: a borrowed string slice
//! would dangle once the engine recycles the input batch.

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Decimal128Array, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray,
    UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType;

use quarry_result::Error;

/// An owned copy of a single non-null array slot.
///
/// Unlike a query-literal type there is no `Null` variant: null handling is
/// resolved upstream of the aggregate, so a `Value` always carries a payload.
/// Variants mirror the supported argument types one-to-one so the wire codec
/// can round-trip each value in its native width.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    /// Also used for `LargeUtf8` input columns.
    Utf8(String),
    Binary(Vec<u8>),
    /// Days since the Unix epoch (1970-01-01).
    Date32(i32),
    /// Raw scaled integer; precision and scale live in the declared type.
    Decimal128(i128),
}

impl Value {
    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Boolean(_) => "Boolean",
            Value::Utf8(_) => "Utf8",
            Value::Binary(_) => "Binary",
            Value::Date32(_) => "Date32",
            Value::Decimal128(_) => "Decimal128",
        }
    }

    /// Extract an owned copy of slot `index` from `array`.
    ///
    /// The caller must have checked validity already; a null slot here is a
    /// contract violation, not a data condition.
    pub fn from_array(array: &ArrayRef, index: usize) -> Result<Value, Error> {
        if array.is_null(index) {
            return Err(Error::Internal(
                "null slot reached value extraction; null policy is resolved upstream".into(),
            ));
        }

        match array.data_type() {
            DataType::Int8 => {
                let arr = downcast::<Int8Array>(array)?;
                Ok(Value::Int8(arr.value(index)))
            }
            DataType::Int16 => {
                let arr = downcast::<Int16Array>(array)?;
                Ok(Value::Int16(arr.value(index)))
            }
            DataType::Int32 => {
                let arr = downcast::<Int32Array>(array)?;
                Ok(Value::Int32(arr.value(index)))
            }
            DataType::Int64 => {
                let arr = downcast::<Int64Array>(array)?;
                Ok(Value::Int64(arr.value(index)))
            }
            DataType::UInt8 => {
                let arr = downcast::<UInt8Array>(array)?;
                Ok(Value::UInt8(arr.value(index)))
            }
            DataType::UInt16 => {
                let arr = downcast::<UInt16Array>(array)?;
                Ok(Value::UInt16(arr.value(index)))
            }
            DataType::UInt32 => {
                let arr = downcast::<UInt32Array>(array)?;
                Ok(Value::UInt32(arr.value(index)))
            }
            DataType::UInt64 => {
                let arr = downcast::<UInt64Array>(array)?;
                Ok(Value::UInt64(arr.value(index)))
            }
            DataType::Float32 => {
                let arr = downcast::<Float32Array>(array)?;
                Ok(Value::Float32(arr.value(index)))
            }
            DataType::Float64 => {
                let arr = downcast::<Float64Array>(array)?;
                Ok(Value::Float64(arr.value(index)))
            }
            DataType::Boolean => {
                let arr = downcast::<BooleanArray>(array)?;
                Ok(Value::Boolean(arr.value(index)))
            }
            DataType::Utf8 => {
                let arr = downcast::<StringArray>(array)?;
                Ok(Value::Utf8(arr.value(index).to_string()))
            }
            DataType::LargeUtf8 => {
                let arr = downcast::<LargeStringArray>(array)?;
                Ok(Value::Utf8(arr.value(index).to_string()))
            }
            DataType::Binary => {
                let arr = downcast::<BinaryArray>(array)?;
                Ok(Value::Binary(arr.value(index).to_vec()))
            }
            DataType::Date32 => {
                let arr = downcast::<Date32Array>(array)?;
                Ok(Value::Date32(arr.value(index)))
            }
            DataType::Decimal128(_, _) => {
                let arr = downcast::<Decimal128Array>(array)?;
                Ok(Value::Decimal128(arr.value(index)))
            }
            other => Err(Error::InvalidArgumentError(format!(
                "unsupported type for value extraction: {other:?}"
            ))),
        }
    }
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T, Error> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::Internal(format!(
            "array claims {:?} but failed to downcast",
            array.data_type()
        ))
    })
}
