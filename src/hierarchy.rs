//! Four-level grouping hierarchy
//!
//! Groups per-sweep recording references into nested tables encoding
//! the experimental design: sweep -> simultaneous recording ->
//! sequential recording -> repetition -> experimental condition. The
//! assembler only references series by recording-table row index; it
//! never touches series content.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::segment::Run;
use crate::sweeps::StimulusState;
use crate::{Error, Result};

/// Tag applied to every simultaneous-recording group: no true
/// concurrent sweeps exist in this kind of session.
pub const SIMULTANEOUS_TAG: &str = "noSimultaneousRecs";

/// One simultaneous-recording group: exactly one recording-table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimultaneousGroup {
    recording_rows: Vec<usize>,
    tag: &'static str,
}

impl SimultaneousGroup {
    /// Referenced recording-table rows (always a single row here).
    #[must_use]
    pub fn recording_rows(&self) -> &[usize] {
        &self.recording_rows
    }

    /// The constant simultaneity tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }
}

/// One sequential-recording group: simultaneous recordings sharing a
/// run and a stimulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequentialGroup {
    simultaneous_rows: Vec<usize>,
    stimulus_type: &'static str,
}

impl SequentialGroup {
    /// Referenced simultaneous-recording rows, in sweep order.
    #[must_use]
    pub fn simultaneous_rows(&self) -> &[usize] {
        &self.simultaneous_rows
    }

    /// Stimulus-type tag derived from the group's state.
    #[must_use]
    pub const fn stimulus_type(&self) -> &'static str {
        self.stimulus_type
    }
}

/// One repetition: every sequential recording produced from one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepetitionGroup {
    sequential_rows: Vec<usize>,
}

impl RepetitionGroup {
    /// Referenced sequential-recording rows, in run order.
    #[must_use]
    pub fn sequential_rows(&self) -> &[usize] {
        &self.sequential_rows
    }
}

/// One experimental condition: repetitions named by the session design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionGroup {
    repetition_rows: Vec<usize>,
    tag: String,
}

impl ConditionGroup {
    /// Referenced repetition rows.
    #[must_use]
    pub fn repetition_rows(&self) -> &[usize] {
        &self.repetition_rows
    }

    /// Human-readable condition label.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// One named condition of a [`ConditionLayout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Condition label, e.g. "baselineStim"
    pub tag: String,
    /// 0-based repetition indices belonging to this condition,
    /// strictly increasing
    pub repetitions: Vec<usize>,
}

impl ConditionSpec {
    /// Convenience constructor.
    #[must_use]
    pub fn new(tag: impl Into<String>, repetitions: Vec<usize>) -> Self {
        Self {
            tag: tag.into(),
            repetitions,
        }
    }
}

/// Experiment-design grouping of repetitions into named conditions.
///
/// This mapping is design metadata, not derivable from the recorded
/// data, so it is supplied as configuration by the caller. It must
/// partition the repetition table exactly: every repetition appears in
/// exactly one condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionLayout {
    conditions: Vec<ConditionSpec>,
}

impl ConditionLayout {
    /// Build a layout from condition specs.
    #[must_use]
    pub fn new(conditions: Vec<ConditionSpec>) -> Self {
        Self { conditions }
    }

    /// The configured condition specs.
    #[must_use]
    pub fn conditions(&self) -> &[ConditionSpec] {
        &self.conditions
    }

    /// Check that this layout exactly partitions `n_repetitions`
    /// repetition rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] for out-of-range, duplicated,
    /// missing, or non-increasing repetition indices.
    pub fn validate(&self, n_repetitions: usize) -> Result<()> {
        let mut seen = vec![false; n_repetitions];
        for spec in &self.conditions {
            if spec.repetitions.is_empty() {
                return Err(Error::InvalidLayout(format!(
                    "condition {:?} references no repetitions",
                    spec.tag
                )));
            }
            for pair in spec.repetitions.windows(2) {
                if pair[1] <= pair[0] {
                    return Err(Error::InvalidLayout(format!(
                        "condition {:?} indices must be strictly increasing",
                        spec.tag
                    )));
                }
            }
            for &rep in &spec.repetitions {
                if rep >= n_repetitions {
                    return Err(Error::InvalidLayout(format!(
                        "condition {:?} references repetition {rep}, but only {n_repetitions} exist",
                        spec.tag
                    )));
                }
                if seen[rep] {
                    return Err(Error::InvalidLayout(format!(
                        "repetition {rep} is referenced by more than one condition"
                    )));
                }
                seen[rep] = true;
            }
        }
        if let Some(missing) = seen.iter().position(|covered| !covered) {
            return Err(Error::InvalidLayout(format!(
                "repetition {missing} is not referenced by any condition"
            )));
        }
        Ok(())
    }
}

/// The assembled four-level grouping of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    /// One group per sweep, 1:1 with recording-table rows
    pub simultaneous: Vec<SimultaneousGroup>,
    /// State partitions within each run, in run order
    pub sequential: Vec<SequentialGroup>,
    /// One group per run
    pub repetitions: Vec<RepetitionGroup>,
    /// Layout-supplied condition groups
    pub conditions: Vec<ConditionGroup>,
}

/// Build the four-level grouping for one session.
///
/// `recording_rows` holds the recording-table row index of each sweep
/// (in sweep order), `runs` the segmented run boundaries, and
/// `state_codes` each sweep's raw state. Within a run, sweeps are
/// partitioned by state in order of first appearance over the run's
/// full inclusive range; each partition becomes one sequential
/// recording.
///
/// # Errors
///
/// * [`Error::LengthMismatch`] if `state_codes` and `recording_rows`
///   disagree in length
/// * [`Error::UnmappedState`] for a state code outside `{0, 1, 2, 9}`
/// * [`Error::InvalidLayout`] if the layout does not exactly partition
///   the repetition table
pub fn assemble(
    recording_rows: &[usize],
    runs: &[Run],
    state_codes: &[i64],
    layout: &ConditionLayout,
) -> Result<Hierarchy> {
    if state_codes.len() != recording_rows.len() {
        return Err(Error::LengthMismatch {
            field: "state_codes",
            expected: recording_rows.len(),
            actual: state_codes.len(),
        });
    }

    // Level 1: one simultaneous group per sweep, preserving order.
    let simultaneous: Vec<SimultaneousGroup> = recording_rows
        .iter()
        .map(|&row| SimultaneousGroup {
            recording_rows: vec![row],
            tag: SIMULTANEOUS_TAG,
        })
        .collect();

    // Levels 2 and 3: per-run state partitions, then one repetition
    // per run referencing its partitions.
    let mut sequential = Vec::new();
    let mut repetitions = Vec::with_capacity(runs.len());
    for run in runs {
        let mut partitions: Vec<(StimulusState, Vec<usize>)> = Vec::new();
        for sweep in run.first_sweep..=run.last_sweep {
            let state = StimulusState::from_code(sweep, state_codes[sweep])?;
            match partitions.iter_mut().find(|(s, _)| *s == state) {
                Some((_, rows)) => rows.push(sweep),
                None => partitions.push((state, vec![sweep])),
            }
        }
        let seq_start = sequential.len();
        for (state, rows) in partitions {
            sequential.push(SequentialGroup {
                simultaneous_rows: rows,
                stimulus_type: state.stimulus_type(),
            });
        }
        repetitions.push(RepetitionGroup {
            sequential_rows: (seq_start..sequential.len()).collect(),
        });
    }

    // Level 4: experiment-design conditions from configuration.
    layout.validate(repetitions.len())?;
    let conditions: Vec<ConditionGroup> = layout
        .conditions()
        .iter()
        .map(|spec| ConditionGroup {
            repetition_rows: spec.repetitions.clone(),
            tag: spec.tag.clone(),
        })
        .collect();

    debug!(
        simultaneous = simultaneous.len(),
        sequential = sequential.len(),
        repetitions = repetitions.len(),
        conditions = conditions.len(),
        "assembled grouping hierarchy"
    );
    Ok(Hierarchy {
        simultaneous,
        sequential,
        repetitions,
        conditions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment_runs;

    fn classic_layout() -> ConditionLayout {
        ConditionLayout::new(vec![
            ConditionSpec::new("baselineStim", vec![0, 3]),
            ConditionSpec::new("noStim", vec![1]),
            ConditionSpec::new("plasticityInduction", vec![2]),
        ])
    }

    fn classic_session() -> (Vec<usize>, Vec<crate::segment::Run>, Vec<i64>) {
        // baseline(0-3, interleaved light/current), break(4-5),
        // plasticity(6-7), baseline(8-9)
        let labels: Vec<String> = ["1", "1", "1", "1", "b", "b", "0", "0", "1", "1"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let points = vec![100; 10];
        let times: Vec<f64> = (0..10).map(|i| i as f64 * 5.0).collect();
        let runs = segment_runs(&labels, &points, &times).unwrap();
        let states = vec![0, 1, 0, 1, 9, 9, 2, 2, 0, 1];
        ((0..10).collect(), runs, states)
    }

    #[test]
    fn test_one_simultaneous_group_per_sweep() {
        let (rows, runs, states) = classic_session();
        let hierarchy = assemble(&rows, &runs, &states, &classic_layout()).unwrap();
        assert_eq!(hierarchy.simultaneous.len(), 10);
        for (sweep, group) in hierarchy.simultaneous.iter().enumerate() {
            assert_eq!(group.recording_rows(), &[sweep]);
            assert_eq!(group.tag(), SIMULTANEOUS_TAG);
        }
    }

    #[test]
    fn test_sequential_partitions_by_first_appearance() {
        let (rows, runs, states) = classic_session();
        let hierarchy = assemble(&rows, &runs, &states, &classic_layout()).unwrap();
        // First baseline run: light appears before current.
        assert_eq!(hierarchy.sequential[0].stimulus_type(), "light");
        assert_eq!(hierarchy.sequential[0].simultaneous_rows(), &[0, 2]);
        assert_eq!(hierarchy.sequential[1].stimulus_type(), "current");
        assert_eq!(hierarchy.sequential[1].simultaneous_rows(), &[1, 3]);
        // Break run collapses to a single noStim partition.
        assert_eq!(hierarchy.sequential[2].stimulus_type(), "noStim");
        assert_eq!(hierarchy.sequential[2].simultaneous_rows(), &[4, 5]);
        // Plasticity run.
        assert_eq!(hierarchy.sequential[3].stimulus_type(), "combined");
    }

    #[test]
    fn test_repetitions_reference_their_runs_partitions() {
        let (rows, runs, states) = classic_session();
        let hierarchy = assemble(&rows, &runs, &states, &classic_layout()).unwrap();
        assert_eq!(hierarchy.repetitions.len(), 4);
        assert_eq!(hierarchy.repetitions[0].sequential_rows(), &[0, 1]);
        assert_eq!(hierarchy.repetitions[1].sequential_rows(), &[2]);
        assert_eq!(hierarchy.repetitions[2].sequential_rows(), &[3]);
        assert_eq!(hierarchy.repetitions[3].sequential_rows(), &[4, 5]);
    }

    #[test]
    fn test_conditions_follow_layout() {
        let (rows, runs, states) = classic_session();
        let hierarchy = assemble(&rows, &runs, &states, &classic_layout()).unwrap();
        assert_eq!(hierarchy.conditions.len(), 3);
        assert_eq!(hierarchy.conditions[0].tag(), "baselineStim");
        assert_eq!(hierarchy.conditions[0].repetition_rows(), &[0, 3]);
        assert_eq!(hierarchy.conditions[2].tag(), "plasticityInduction");
        assert_eq!(hierarchy.conditions[2].repetition_rows(), &[2]);
    }

    #[test]
    fn test_break_state_inside_baseline_run_tags_no_stim() {
        let labels: Vec<String> = ["1", "1", "1", "1"].iter().map(|s| (*s).to_string()).collect();
        let points = vec![100; 4];
        let times: Vec<f64> = (0..4).map(|i| i as f64).collect();
        let runs = segment_runs(&labels, &points, &times).unwrap();
        let states = vec![0, 9, 0, 0];
        let layout = ConditionLayout::new(vec![ConditionSpec::new("baselineStim", vec![0])]);
        let hierarchy = assemble(&[0, 1, 2, 3], &runs, &states, &layout).unwrap();
        let no_stim = hierarchy
            .sequential
            .iter()
            .find(|g| g.stimulus_type() == "noStim")
            .expect("state 9 partition");
        assert_eq!(no_stim.simultaneous_rows(), &[1]);
    }

    #[test]
    fn test_unmapped_state_is_fatal() {
        let (rows, runs, mut states) = classic_session();
        states[6] = 5;
        assert!(matches!(
            assemble(&rows, &runs, &states, &classic_layout()),
            Err(Error::UnmappedState { sweep: 6, state: 5 })
        ));
    }

    #[test]
    fn test_layout_must_cover_every_repetition() {
        let (rows, runs, states) = classic_session();
        let layout = ConditionLayout::new(vec![
            ConditionSpec::new("baselineStim", vec![0, 3]),
            ConditionSpec::new("noStim", vec![1]),
        ]);
        assert!(matches!(
            assemble(&rows, &runs, &states, &layout),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_layout_rejects_duplicates_and_out_of_range() {
        let layout = ConditionLayout::new(vec![
            ConditionSpec::new("a", vec![0, 1]),
            ConditionSpec::new("b", vec![1]),
        ]);
        assert!(layout.validate(2).is_err());

        let layout = ConditionLayout::new(vec![ConditionSpec::new("a", vec![0, 7])]);
        assert!(layout.validate(2).is_err());

        let layout = ConditionLayout::new(vec![ConditionSpec::new("a", vec![1, 0])]);
        assert!(layout.validate(2).is_err());
    }

    #[test]
    fn test_sequential_groups_exhaust_each_run() {
        let (rows, runs, states) = classic_session();
        let hierarchy = assemble(&rows, &runs, &states, &classic_layout()).unwrap();
        for (run, repetition) in runs.iter().zip(&hierarchy.repetitions) {
            let mut covered: Vec<usize> = repetition
                .sequential_rows()
                .iter()
                .flat_map(|&seq| hierarchy.sequential[seq].simultaneous_rows().to_vec())
                .collect();
            covered.sort_unstable();
            let expected: Vec<usize> = (run.first_sweep..=run.last_sweep).collect();
            assert_eq!(covered, expected);
        }
    }
}
