//! Grouped batch driver for the equal-ranges aggregate.
//!
//! One driver instance plays the role of a worker-local partial aggregation:
//! it routes each row of a batch to its group's state, and later folds other
//! drivers (or serialized states shipped from another stage) into itself.
//! Scheduling stays with the caller: the driver assumes rows arrive in
//! sequence order within each partial, and that partials are merged in an
//! order consistent with the original row order.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, RecordBatch, UInt64Array, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use rustc_hash::FxHashMap;

use quarry_result::{Error, Result};
use quarry_types::GroupId;

use crate::{CountEqualRanges, EqualRangesState};

/// Per-group state table plus the function that drives it.
pub struct GroupedEqualRanges {
    function: CountEqualRanges,
    groups: FxHashMap<GroupId, EqualRangesState>,
    alias: String,
}

impl GroupedEqualRanges {
    pub fn new(function: CountEqualRanges, alias: impl Into<String>) -> Self {
        Self {
            function,
            groups: FxHashMap::default(),
            alias: alias.into(),
        }
    }

    /// Number of groups observed so far.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Route one batch of rows to their groups, in row order.
    ///
    /// `group_ids[i]` names the group of `values[i]`. Group ids come from
    /// the engine's grouping layer and must be non-null; value slots may be
    /// null and are skipped per the adapter's null policy.
    pub fn update_batch(&mut self, group_ids: &UInt64Array, values: &ArrayRef) -> Result<()> {
        if group_ids.len() != values.len() {
            return Err(Error::InvalidArgumentError(format!(
                "group id column has {} rows but value column has {}",
                group_ids.len(),
                values.len()
            )));
        }
        if group_ids.null_count() != 0 {
            return Err(Error::InvalidArgumentError(
                "group id column must be non-null".into(),
            ));
        }

        let function = &self.function;
        for row in 0..values.len() {
            let state = self
                .groups
                .entry(group_ids.value(row))
                .or_insert_with(EqualRangesState::new);
            function.update_row(state, values, row)?;
        }
        Ok(())
    }

    /// Fold another driver into this one, group by group.
    ///
    /// `other` must cover the rows that follow this driver's rows in each
    /// group's sequence order; direction matters.
    pub fn merge_partial(&mut self, other: GroupedEqualRanges) -> Result<()> {
        if other.function.data_type() != self.function.data_type() {
            return Err(Error::InvalidArgumentError(format!(
                "cannot merge partial aggregates over {:?} into {:?}",
                other.function.data_type(),
                self.function.data_type()
            )));
        }

        tracing::debug!(
            incoming = other.groups.len(),
            existing = self.groups.len(),
            "merging partial equal-ranges states"
        );

        let function = &self.function;
        for (group_id, partial) in other.groups {
            match self.groups.entry(group_id) {
                Entry::Occupied(mut entry) => function.merge(entry.get_mut(), &partial),
                Entry::Vacant(entry) => {
                    entry.insert(partial);
                }
            }
        }
        Ok(())
    }

    /// Export every group's state in wire format, sorted by group id.
    pub fn serialize_partials(&self) -> Result<Vec<(GroupId, Vec<u8>)>> {
        let mut out = Vec::with_capacity(self.groups.len());
        for (group_id, state) in &self.groups {
            let mut buf = Vec::new();
            self.function.serialize(state, &mut buf)?;
            out.push((*group_id, buf));
        }
        out.sort_unstable_by_key(|(group_id, _)| *group_id);
        Ok(out)
    }

    /// Decode a serialized partial state and fold it into `group_id`.
    ///
    /// The bytes must contain exactly one state; trailing garbage is treated
    /// as corruption rather than ignored.
    pub fn absorb_serialized(&mut self, group_id: GroupId, mut bytes: &[u8]) -> Result<()> {
        let partial = self.function.deserialize(&mut bytes)?;
        if !bytes.is_empty() {
            return Err(Error::CorruptedState(format!(
                "{} trailing bytes after serialized state",
                bytes.len()
            )));
        }

        tracing::debug!(group_id, "absorbing serialized partial state");

        let function = &self.function;
        match self.groups.entry(group_id) {
            Entry::Occupied(mut entry) => function.merge(entry.get_mut(), &partial),
            Entry::Vacant(entry) => {
                entry.insert(partial);
            }
        }
        Ok(())
    }

    /// Finalize every group into a two-column batch, sorted by group id for
    /// deterministic output.
    pub fn finish(self) -> Result<RecordBatch> {
        let mut group_ids: Vec<GroupId> = self.groups.keys().copied().collect();
        group_ids.sort_unstable();

        let mut id_builder = UInt64Builder::with_capacity(group_ids.len());
        let mut count_builder = UInt64Builder::with_capacity(group_ids.len());
        for group_id in &group_ids {
            id_builder.append_value(*group_id);
            count_builder.append_value(self.function.finalize(&self.groups[group_id]));
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("group_id", DataType::UInt64, false),
            self.function.output_field(&self.alias),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(id_builder.finish()) as ArrayRef,
                Arc::new(count_builder.finish()) as ArrayRef,
            ],
        )?;
        Ok(batch)
    }
}
