//! Run segmentation
//!
//! Partitions the flat, ordered sweep sequence into maximal contiguous
//! runs, classifying each run's experimental kind and physical unit
//! from the leading character of its sweep labels. This classification
//! is load-bearing for every downstream grouping table, so unrecognized
//! labels abort the conversion instead of defaulting.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Experimental kind of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunKind {
    /// Interleaved light/current baseline stimulation
    Baseline,
    /// Idle sweeps while switching between conditions
    Break,
    /// Plasticity-induction protocol
    Plasticity,
}

impl RunKind {
    /// Human-readable tag used by the sweep-metadata side table.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Break => "break",
            Self::Plasticity => "plasticity",
        }
    }

    /// Physical unit of the measured response for this run kind.
    ///
    /// Baseline and break runs are recorded in voltage clamp (the
    /// response is a current); plasticity runs are recorded in current
    /// clamp (the response is a voltage). Fixed table for this
    /// protocol; sessions recording other designs are out of scope.
    #[must_use]
    pub const fn unit(self) -> RecordingUnit {
        match self {
            Self::Baseline | Self::Break => RecordingUnit::Amperes,
            Self::Plasticity => RecordingUnit::Volts,
        }
    }
}

/// Physical unit of a recorded or command waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingUnit {
    /// Current measurement (voltage-clamp response, current-clamp command)
    Amperes,
    /// Voltage measurement (current-clamp response, voltage-clamp command)
    Volts,
}

impl RecordingUnit {
    /// Unit name as stored in the series metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amperes => "amperes",
            Self::Volts => "volts",
        }
    }
}

/// A maximal contiguous block of sweeps sharing a classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Experimental kind of the run
    pub kind: RunKind,
    /// Physical unit of the measured response
    pub unit: RecordingUnit,
    /// First sweep position (0-based, inclusive)
    pub first_sweep: usize,
    /// Last sweep position (0-based, inclusive)
    pub last_sweep: usize,
    /// Start time of the run's first sweep in seconds
    pub start_time: f64,
    /// Data points per sweep at the run's first sweep
    pub points: usize,
}

impl Run {
    /// Whether the given sweep position falls inside this run.
    #[must_use]
    pub const fn contains(&self, sweep: usize) -> bool {
        self.first_sweep <= sweep && sweep <= self.last_sweep
    }

    /// Number of sweeps in the run.
    #[must_use]
    pub const fn sweep_count(&self) -> usize {
        self.last_sweep - self.first_sweep + 1
    }
}

/// A run boundary discovered during the label scan.
#[derive(Debug, Clone, Copy)]
struct RunStart {
    start: usize,
    kind: RunKind,
}

fn leading(sweep: usize, label: &str) -> Result<char> {
    label.chars().next().ok_or_else(|| Error::MalformedLabel {
        sweep,
        label: label.to_string(),
    })
}

fn classify(sweep: usize, label: &str) -> Result<RunKind> {
    match leading(sweep, label)? {
        'b' => Ok(RunKind::Break),
        '0' => Ok(RunKind::Plasticity),
        '1' => Ok(RunKind::Baseline),
        _ => Err(Error::MalformedLabel {
            sweep,
            label: label.to_string(),
        }),
    }
}

/// Partition the sweep sequence into classified runs.
///
/// The first run always opens at sweep 0 as baseline in amperes,
/// regardless of its label. Boundary detection walks positions
/// `1..=N-2`, opening a new run wherever the leading label character
/// changes; the final sweep is never inspected for a new boundary and
/// is absorbed into the last open run (documented source behavior for
/// session-ending sweeps).
///
/// Implemented as a fold producing an immutable run list; nothing else
/// mutates the accumulator.
///
/// # Errors
///
/// * [`Error::EmptySession`] for fewer than 2 sweeps
/// * [`Error::MalformedLabel`] for an empty label in the scanned range
///   or a boundary label outside the `{'b', '0', '1'}` alphabet
pub fn segment_runs(
    labels: &[String],
    point_counts: &[usize],
    start_times: &[f64],
) -> Result<Vec<Run>> {
    let n = labels.len();
    if n < 2 {
        return Err(Error::EmptySession(n));
    }

    let first = RunStart {
        start: 0,
        kind: RunKind::Baseline,
    };
    let starts = (1..n - 1).try_fold(vec![first], |mut acc, sweep| {
        if leading(sweep, &labels[sweep])? != leading(sweep - 1, &labels[sweep - 1])? {
            acc.push(RunStart {
                start: sweep,
                kind: classify(sweep, &labels[sweep])?,
            });
        }
        Ok::<_, Error>(acc)
    })?;

    let runs: Vec<Run> = starts
        .iter()
        .enumerate()
        .map(|(i, boundary)| {
            let last_sweep = starts
                .get(i + 1)
                .map_or(n - 1, |next| next.start - 1);
            Run {
                kind: boundary.kind,
                unit: boundary.kind.unit(),
                first_sweep: boundary.start,
                last_sweep,
                start_time: start_times[boundary.start],
                points: point_counts[boundary.start],
            }
        })
        .collect();

    for run in &runs {
        debug!(
            kind = run.kind.tag(),
            unit = run.unit.as_str(),
            first = run.first_sweep,
            last = run.last_sweep,
            "segmented run"
        );
    }
    Ok(runs)
}

/// Index of the run containing the given sweep position.
#[must_use]
pub fn run_index_for(runs: &[Run], sweep: usize) -> Option<usize> {
    runs.iter().position(|run| run.contains(sweep))
}
