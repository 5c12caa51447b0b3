//! Session Store - in-memory sink for the converted session
//!
//! Receives the entities the conversion pass produces and keeps them
//! in the table shapes the downstream data-model library expects:
//! insertion returns row indices, and the grouping tables reference
//! rows strictly by index.

use serde::{Deserialize, Serialize};

use super::{DeviceRecord, ElectrodeRecord, SessionRecord, SubjectRecord};
use crate::hierarchy::Hierarchy;
use crate::series::SeriesPair;
use crate::Result;

/// One row of the intracellular recording table.
///
/// Stimulus indices of -1 mirror the source convention for "whole
/// series, no explicit command window".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRow {
    id: i64,
    series: usize,
    stimulus_start_index: i64,
    stimulus_index_count: i64,
    response_start_index: usize,
    response_index_count: usize,
}

impl RecordingRow {
    /// Sweep id recorded on this row.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Index into the store's series-pair list.
    #[must_use]
    pub const fn series(&self) -> usize {
        self.series
    }

    /// Start index of the command window (-1: unspecified).
    #[must_use]
    pub const fn stimulus_start_index(&self) -> i64 {
        self.stimulus_start_index
    }

    /// Length of the command window (-1: unspecified).
    #[must_use]
    pub const fn stimulus_index_count(&self) -> i64 {
        self.stimulus_index_count
    }

    /// Start index of the response window.
    #[must_use]
    pub const fn response_start_index(&self) -> usize {
        self.response_start_index
    }

    /// Length of the response window (the sweep's point count).
    #[must_use]
    pub const fn response_index_count(&self) -> usize {
        self.response_index_count
    }
}

/// One row of the sweep-metadata side table, keyed by sweep id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Recorded sweep order (the session-assigned sweep id)
    pub id: i64,
    /// Number of data points within the sweep
    pub points: usize,
    /// Sweep recording start time in seconds
    pub start_time: f64,
    /// Raw experimental state code
    pub state: i64,
    /// Experimental state label from the source metadata
    pub label: String,
    /// Owning run's condition tag (baseline/break/plasticity)
    pub condition: String,
}

/// In-memory store for one converted session.
///
/// Append-only during the conversion pass; the `add_*` methods return
/// the new row's index so callers can wire up the grouping tables the
/// same way the downstream persistence API does.
#[derive(Debug, Default, Serialize)]
pub struct SessionStore {
    session: Option<SessionRecord>,
    subject: Option<SubjectRecord>,
    device: Option<DeviceRecord>,
    electrode: Option<ElectrodeRecord>,
    series: Vec<SeriesPair>,
    recordings: Vec<RecordingRow>,
    sweep_table: Vec<SweepRow>,
    hierarchy: Option<Hierarchy>,
}

impl SessionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds no entities at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.session.is_none()
            && self.series.is_empty()
            && self.recordings.is_empty()
            && self.sweep_table.is_empty()
            && self.hierarchy.is_none()
    }

    /// Number of stored series pairs.
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Number of recording-table rows.
    #[must_use]
    pub fn recording_count(&self) -> usize {
        self.recordings.len()
    }

    /// Number of sweep-metadata rows.
    #[must_use]
    pub fn sweep_row_count(&self) -> usize {
        self.sweep_table.len()
    }

    /// Attach the session metadata record.
    pub fn set_session(&mut self, session: SessionRecord) {
        self.session = Some(session);
    }

    /// Attach the subject metadata record.
    pub fn set_subject(&mut self, subject: SubjectRecord) {
        self.subject = Some(subject);
    }

    /// Attach the device metadata record.
    pub fn set_device(&mut self, device: DeviceRecord) {
        self.device = Some(device);
    }

    /// Attach the electrode metadata record.
    pub fn set_electrode(&mut self, electrode: ElectrodeRecord) {
        self.electrode = Some(electrode);
    }

    /// Append a series pair, returning its index.
    pub fn add_series_pair(&mut self, pair: SeriesPair) -> usize {
        self.series.push(pair);
        self.series.len() - 1
    }

    /// Append a recording-table row, returning its row index.
    ///
    /// `series` is the index returned by [`Self::add_series_pair`] and
    /// `response_index_count` the sweep's point count.
    pub fn add_recording(&mut self, id: i64, series: usize, response_index_count: usize) -> usize {
        self.recordings.push(RecordingRow {
            id,
            series,
            stimulus_start_index: -1,
            stimulus_index_count: -1,
            response_start_index: 0,
            response_index_count,
        });
        self.recordings.len() - 1
    }

    /// Append a sweep-metadata row.
    pub fn add_sweep_row(&mut self, row: SweepRow) {
        self.sweep_table.push(row);
    }

    /// Attach the assembled grouping hierarchy.
    pub fn set_hierarchy(&mut self, hierarchy: Hierarchy) {
        self.hierarchy = Some(hierarchy);
    }

    /// Get the session record, if attached.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionRecord> {
        self.session.as_ref()
    }

    /// Get the subject record, if attached.
    #[must_use]
    pub const fn subject(&self) -> Option<&SubjectRecord> {
        self.subject.as_ref()
    }

    /// Get the device record, if attached.
    #[must_use]
    pub const fn device(&self) -> Option<&DeviceRecord> {
        self.device.as_ref()
    }

    /// Get the electrode record, if attached.
    #[must_use]
    pub const fn electrode(&self) -> Option<&ElectrodeRecord> {
        self.electrode.as_ref()
    }

    /// All stored series pairs, in sweep order.
    #[must_use]
    pub fn series(&self) -> &[SeriesPair] {
        &self.series
    }

    /// All recording-table rows, in insertion order.
    #[must_use]
    pub fn recordings(&self) -> &[RecordingRow] {
        &self.recordings
    }

    /// The sweep-metadata side table.
    #[must_use]
    pub fn sweep_table(&self) -> &[SweepRow] {
        &self.sweep_table
    }

    /// The grouping hierarchy, if attached.
    #[must_use]
    pub const fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    /// Pretty-printed JSON snapshot of the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialize`] if serialization fails.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
