use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field};
use quarry_aggregate::CountEqualRanges;
use quarry_result::Error;

fn int64_function() -> CountEqualRanges {
    CountEqualRanges::try_new(&[DataType::Int64]).unwrap()
}

fn count_int64(values: Vec<i64>) -> u64 {
    let function = int64_function();
    let mut state = function.create_state();
    let array: ArrayRef = Arc::new(Int64Array::from(values));
    function.update_batch(&mut state, &array).unwrap();
    function.finalize(&state)
}

#[test]
fn single_run() {
    assert_eq!(count_int64(vec![1, 1, 1]), 1);
}

#[test]
fn all_distinct() {
    assert_eq!(count_int64(vec![1, 2, 3]), 3);
}

#[test]
fn revisited_value_starts_a_new_run() {
    assert_eq!(count_int64(vec![1, 1, 2, 2, 1, 1]), 3);
}

#[test]
fn empty_input_counts_zero() {
    assert_eq!(count_int64(vec![]), 0);
    let function = int64_function();
    let state = function.create_state();
    assert!(state.is_empty());
    assert_eq!(function.finalize(&state), 0);
}

#[test]
fn finalize_is_a_pure_read() {
    let function = int64_function();
    let mut state = function.create_state();
    let array: ArrayRef = Arc::new(Int64Array::from(vec![5, 5, 7]));
    function.update_batch(&mut state, &array).unwrap();
    assert_eq!(function.finalize(&state), 2);
    assert_eq!(function.finalize(&state), 2);

    // The state keeps accepting updates after a finalize.
    function.update_row(&mut state, &array, 0).unwrap();
    assert_eq!(function.finalize(&state), 3);
}

#[test]
fn string_runs() {
    let function = CountEqualRanges::try_new(&[DataType::Utf8]).unwrap();
    let mut state = function.create_state();
    let array: ArrayRef = Arc::new(StringArray::from(vec!["a", "a", "bb", "bb", "a"]));
    function.update_batch(&mut state, &array).unwrap();
    assert_eq!(function.finalize(&state), 3);
}

#[test]
fn nan_runs_use_bitwise_equality() {
    let function = CountEqualRanges::try_new(&[DataType::Float64]).unwrap();
    let mut state = function.create_state();
    let array: ArrayRef = Arc::new(Float64Array::from(vec![f64::NAN, f64::NAN, 1.0, 1.0]));
    function.update_batch(&mut state, &array).unwrap();
    // Adjacent NaNs form one run under bitwise equality.
    assert_eq!(function.finalize(&state), 2);
}

#[test]
fn null_slots_are_skipped() {
    let function = int64_function();
    let mut state = function.create_state();
    let array: ArrayRef = Arc::new(Int64Array::from(vec![
        Some(1),
        None,
        Some(1),
        None,
        Some(2),
    ]));
    function.update_batch(&mut state, &array).unwrap();
    // Effective sequence is [1, 1, 2].
    assert_eq!(function.finalize(&state), 2);
}

#[test]
fn function_is_debug_printable() {
    // Construction results get debug-printed in engine diagnostics (and by
    // assertions on the error path), so the adapter must format cleanly.
    let rendered = format!("{:?}", CountEqualRanges::try_new(&[DataType::Int64]));
    assert!(rendered.contains("CountEqualRanges"));
}

#[test]
fn construction_rejects_wrong_argument_count() {
    let err = CountEqualRanges::try_new(&[]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));

    let err = CountEqualRanges::try_new(&[DataType::Int64, DataType::Int64]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));
}

#[test]
fn construction_rejects_non_comparable_type() {
    let list = DataType::List(Arc::new(Field::new("item", DataType::Int32, true)));
    let err = CountEqualRanges::try_new(&[list]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));
}

#[test]
fn batch_type_mismatch_is_rejected() {
    let function = int64_function();
    let mut state = function.create_state();
    let array: ArrayRef = Arc::new(StringArray::from(vec!["a"]));
    let err = function.update_batch(&mut state, &array).unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));
    // Nothing was absorbed.
    assert!(state.is_empty());
}

#[test]
fn output_field_is_non_nullable_uint64() {
    let function = int64_function();
    let field = function.output_field("ranges");
    assert_eq!(field.name(), "ranges");
    assert_eq!(field.data_type(), &DataType::UInt64);
    assert!(!field.is_nullable());
}
