//! Single-pass session conversion
//!
//! Wires the pipeline together: validate the input arrays, segment
//! runs, build one series pair per sweep, register recording rows,
//! attach the sweep-metadata side table, assemble the grouping
//! hierarchy, and hand everything to the session store. One forward
//! pass, no partial results: any error aborts the whole conversion.

use tracing::{debug, info};

use crate::hierarchy::{assemble, ConditionLayout};
use crate::segment::segment_runs;
use crate::series::{build_series_pair, ScaleFactors, SweepInput};
use crate::session::{
    DeviceRecord, ElectrodeRecord, SessionRecord, SessionStore, SubjectRecord, SweepRow,
};
use crate::sweeps::{StimulusState, SweepSet};
use crate::Result;

/// Flat metadata attached to the converted session.
///
/// Pure field copying; none of this is derived from the recorded data.
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    /// Session record (required)
    pub session: SessionRecord,
    /// Subject (animal) record
    pub subject: Option<SubjectRecord>,
    /// Recording device record
    pub device: Option<DeviceRecord>,
    /// Electrode record
    pub electrode: Option<ElectrodeRecord>,
}

impl SessionMetadata {
    /// Metadata carrying only the required session record.
    #[must_use]
    pub const fn new(session: SessionRecord) -> Self {
        Self {
            session,
            subject: None,
            device: None,
            electrode: None,
        }
    }
}

/// Convert one session into a populated [`SessionStore`].
///
/// # Errors
///
/// Propagates every data-quality error of the pipeline stages: input
/// precondition failures ([`crate::Error::LengthMismatch`],
/// [`crate::Error::EmptySession`], [`crate::Error::PointCountMismatch`],
/// [`crate::Error::InvalidSamplingInterval`]), segmentation failures
/// ([`crate::Error::MalformedLabel`]), series annotation failures
/// ([`crate::Error::UnmappedState`],
/// [`crate::Error::UnsupportedBaselineState`]), and layout failures
/// ([`crate::Error::InvalidLayout`]).
pub fn convert_session(
    sweeps: &SweepSet,
    metadata: SessionMetadata,
    layout: &ConditionLayout,
    scales: &ScaleFactors,
) -> Result<SessionStore> {
    sweeps.validate()?;
    let runs = segment_runs(&sweeps.labels, &sweeps.point_counts, &sweeps.start_times)?;
    let rate = sweeps.sampling_rate();
    debug!(sweeps = sweeps.len(), runs = runs.len(), rate, "starting conversion");

    let mut store = SessionStore::new();
    let mut recording_rows = Vec::with_capacity(sweeps.len());

    // Runs partition the sweep sequence, so walking them in order
    // visits every sweep exactly once, in sweep order.
    for run in &runs {
        for index in run.first_sweep..=run.last_sweep {
            let view = sweeps.sweep(index);
            let state = StimulusState::from_code(index, view.state_code)?;
            let pair = build_series_pair(
                SweepInput {
                    index,
                    order: index + 1,
                    sweep_id: view.id,
                    kind: run.kind,
                    state,
                    unit: run.unit,
                    sampling_rate: rate,
                    start_time: view.start_time,
                    data: view.samples.to_vec(),
                },
                scales,
            )?;
            let series = store.add_series_pair(pair);
            recording_rows.push(store.add_recording(view.id, series, view.points));
            store.add_sweep_row(SweepRow {
                id: view.id,
                points: view.points,
                start_time: view.start_time,
                state: view.state_code,
                label: view.label.to_string(),
                condition: run.kind.tag().to_string(),
            });
        }
    }

    let hierarchy = assemble(&recording_rows, &runs, &sweeps.state_codes, layout)?;
    store.set_hierarchy(hierarchy);

    store.set_session(metadata.session);
    if let Some(subject) = metadata.subject {
        store.set_subject(subject);
    }
    if let Some(device) = metadata.device {
        store.set_device(device);
    }
    if let Some(electrode) = metadata.electrode {
        store.set_electrode(electrode);
    }

    info!(
        recordings = store.recording_count(),
        runs = runs.len(),
        "session conversion complete"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::ConditionSpec;
    use chrono::Utc;

    fn metadata() -> SessionMetadata {
        SessionMetadata::new(SessionRecord::new("test", "test session", Utc::now()))
    }

    fn small_session() -> SweepSet {
        SweepSet {
            ids: (1..=6).collect(),
            labels: ["1", "1", "b", "0", "0", "1"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            point_counts: vec![4; 6],
            start_times: (0..6).map(|i| f64::from(i) * 5.0).collect(),
            state_codes: vec![0, 1, 9, 2, 2, 0],
            samples: vec![vec![1.0, 2.0, 3.0, 4.0]; 6],
            sampling_interval: 5e-5,
        }
    }

    fn small_layout() -> ConditionLayout {
        ConditionLayout::new(vec![
            ConditionSpec::new("baselineStim", vec![0, 3]),
            ConditionSpec::new("noStim", vec![1]),
            ConditionSpec::new("plasticityInduction", vec![2]),
        ])
    }

    #[test]
    fn test_convert_produces_one_pair_per_sweep() {
        let store = convert_session(
            &small_session(),
            metadata(),
            &small_layout(),
            &ScaleFactors::default(),
        )
        .unwrap();
        assert_eq!(store.series_count(), 6);
        assert_eq!(store.recording_count(), 6);
        assert_eq!(store.sweep_row_count(), 6);
        assert_eq!(store.hierarchy().unwrap().repetitions.len(), 4);
    }

    #[test]
    fn test_recording_rows_follow_sweep_order() {
        let store = convert_session(
            &small_session(),
            metadata(),
            &small_layout(),
            &ScaleFactors::default(),
        )
        .unwrap();
        for (i, row) in store.recordings().iter().enumerate() {
            assert_eq!(row.series(), i);
            assert_eq!(row.id(), i as i64 + 1);
            assert_eq!(row.response_index_count(), 4);
        }
        assert_eq!(store.series()[0].response.name(), "PatchClampSeries001");
        assert_eq!(store.series()[5].response.name(), "PatchClampSeries006");
    }

    #[test]
    fn test_side_table_condition_tags() {
        let store = convert_session(
            &small_session(),
            metadata(),
            &small_layout(),
            &ScaleFactors::default(),
        )
        .unwrap();
        let conditions: Vec<&str> = store
            .sweep_table()
            .iter()
            .map(|row| row.condition.as_str())
            .collect();
        assert_eq!(
            conditions,
            ["baseline", "baseline", "break", "plasticity", "plasticity", "baseline"]
        );
    }

    #[test]
    fn test_bad_layout_aborts_whole_conversion() {
        let layout = ConditionLayout::new(vec![ConditionSpec::new("only", vec![0])]);
        assert!(convert_session(
            &small_session(),
            metadata(),
            &layout,
            &ScaleFactors::default()
        )
        .is_err());
    }

    #[test]
    fn test_unmapped_state_aborts_whole_conversion() {
        let mut sweeps = small_session();
        sweeps.state_codes[1] = 4;
        assert!(convert_session(
            &sweeps,
            metadata(),
            &small_layout(),
            &ScaleFactors::default()
        )
        .is_err());
    }
}
