//! Native binary codec for transported aggregate state values.
//!
//! Partial aggregate states may be serialized on one machine and
//! deserialized on another, so the encoding is fixed here once: primitives
//! are little-endian at their native width, strings and binary are
//! u32-length-prefixed. Decoding consumes from a cursor (`&mut &[u8]`) so a
//! state can be embedded in a larger reduction stream.

use arrow::datatypes::DataType;

use crate::Value;

/// Error encoding a value under a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The provided value does not match the requested type.
    TypeMismatch {
        expected: DataType,
        got: &'static str,
    },
    /// A variable-width value exceeds the u32 length prefix.
    ValueTooLarge,
}

/// Error type for decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input slice does not contain enough bytes to decode a value.
    NotEnoughData,
    /// The byte format is invalid for the target type (e.g., invalid UTF-8).
    InvalidFormat,
}

macro_rules! encode_fixed {
    ($out:ident, $x:ident) => {{
        $out.extend_from_slice(&$x.to_le_bytes());
        Ok(())
    }};
}

/// Encode `value` into `out` using `dtype`'s native encoding. Appends.
///
/// A value whose variant disagrees with `dtype` is rejected rather than
/// written: a mixed-width buffer would be undecodable downstream.
pub fn encode_value(value: &Value, dtype: &DataType, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let mismatch = || EncodeError::TypeMismatch {
        expected: dtype.clone(),
        got: value.type_name(),
    };
    match (dtype, value) {
        (DataType::Int8, Value::Int8(x)) => encode_fixed!(out, x),
        (DataType::Int16, Value::Int16(x)) => encode_fixed!(out, x),
        (DataType::Int32, Value::Int32(x)) => encode_fixed!(out, x),
        (DataType::Int64, Value::Int64(x)) => encode_fixed!(out, x),
        (DataType::UInt8, Value::UInt8(x)) => encode_fixed!(out, x),
        (DataType::UInt16, Value::UInt16(x)) => encode_fixed!(out, x),
        (DataType::UInt32, Value::UInt32(x)) => encode_fixed!(out, x),
        (DataType::UInt64, Value::UInt64(x)) => encode_fixed!(out, x),
        (DataType::Float32, Value::Float32(x)) => encode_fixed!(out, x),
        (DataType::Float64, Value::Float64(x)) => encode_fixed!(out, x),
        (DataType::Boolean, Value::Boolean(b)) => {
            out.push(u8::from(*b));
            Ok(())
        }
        (DataType::Utf8 | DataType::LargeUtf8, Value::Utf8(s)) => {
            encode_len_prefixed(s.as_bytes(), out)
        }
        (DataType::Binary, Value::Binary(b)) => encode_len_prefixed(b, out),
        (DataType::Date32, Value::Date32(x)) => encode_fixed!(out, x),
        (DataType::Decimal128(_, _), Value::Decimal128(x)) => encode_fixed!(out, x),
        _ => Err(mismatch()),
    }
}

/// Decode one value of `dtype` from the front of `src`, advancing the cursor.
pub fn decode_value(src: &mut &[u8], dtype: &DataType) -> Result<Value, DecodeError> {
    match dtype {
        DataType::Int8 => Ok(Value::Int8(i8::from_le_bytes(take_fixed(src)?))),
        DataType::Int16 => Ok(Value::Int16(i16::from_le_bytes(take_fixed(src)?))),
        DataType::Int32 => Ok(Value::Int32(i32::from_le_bytes(take_fixed(src)?))),
        DataType::Int64 => Ok(Value::Int64(i64::from_le_bytes(take_fixed(src)?))),
        DataType::UInt8 => Ok(Value::UInt8(u8::from_le_bytes(take_fixed(src)?))),
        DataType::UInt16 => Ok(Value::UInt16(u16::from_le_bytes(take_fixed(src)?))),
        DataType::UInt32 => Ok(Value::UInt32(u32::from_le_bytes(take_fixed(src)?))),
        DataType::UInt64 => Ok(Value::UInt64(u64::from_le_bytes(take_fixed(src)?))),
        DataType::Float32 => Ok(Value::Float32(f32::from_le_bytes(take_fixed(src)?))),
        DataType::Float64 => Ok(Value::Float64(f64::from_le_bytes(take_fixed(src)?))),
        DataType::Boolean => match take_fixed::<1>(src)?[0] {
            0 => Ok(Value::Boolean(false)),
            1 => Ok(Value::Boolean(true)),
            _ => Err(DecodeError::InvalidFormat),
        },
        DataType::Utf8 | DataType::LargeUtf8 => {
            let bytes = take_len_prefixed(src)?;
            let s = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidFormat)?;
            Ok(Value::Utf8(s.to_string()))
        }
        DataType::Binary => Ok(Value::Binary(take_len_prefixed(src)?.to_vec())),
        DataType::Date32 => Ok(Value::Date32(i32::from_le_bytes(take_fixed(src)?))),
        DataType::Decimal128(_, _) => Ok(Value::Decimal128(i128::from_le_bytes(take_fixed(src)?))),
        _ => Err(DecodeError::InvalidFormat),
    }
}

fn encode_len_prefixed(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    // u32 is plenty: a single column value never approaches 4 GiB.
    let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::ValueTooLarge)?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn take_fixed<const N: usize>(src: &mut &[u8]) -> Result<[u8; N], DecodeError> {
    if src.len() < N {
        return Err(DecodeError::NotEnoughData);
    }
    let (head, rest) = src.split_at(N);
    *src = rest;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(head);
    Ok(bytes)
}

fn take_len_prefixed<'a>(src: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let len = u32::from_le_bytes(take_fixed(src)?) as usize;
    if src.len() < len {
        return Err(DecodeError::NotEnoughData);
    }
    let (head, rest) = src.split_at(len);
    *src = rest;
    Ok(head)
}
