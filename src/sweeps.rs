//! Typed input model for a single recording session
//!
//! The proprietary matrix file is loaded elsewhere; this module receives
//! the already-parsed, in-memory arrays (one entry per sweep, plus the
//! sample matrix) and checks every precondition the pipeline relies on
//! before any segmentation begins.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Stimulation state of one sweep, as encoded in the source metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StimulusState {
    /// Light stimulation during the baseline condition (code 0)
    Light,
    /// Current stimulation during the baseline condition (code 1)
    Current,
    /// Simultaneous current and light stimulation (plasticity, code 2)
    Combined,
    /// Break between baseline and plasticity conditions (code 9)
    Break,
}

impl StimulusState {
    /// Decode a raw state code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnmappedState`] for codes outside `{0, 1, 2, 9}`.
    pub fn from_code(sweep: usize, code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Light),
            1 => Ok(Self::Current),
            2 => Ok(Self::Combined),
            9 => Ok(Self::Break),
            _ => Err(Error::UnmappedState { sweep, state: code }),
        }
    }

    /// Raw state code as found in the source metadata.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Light => 0,
            Self::Current => 1,
            Self::Combined => 2,
            Self::Break => 9,
        }
    }

    /// Stimulus-type tag used by the sequential-recording table.
    #[must_use]
    pub const fn stimulus_type(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Current => "current",
            Self::Combined => "combined",
            Self::Break => "noStim",
        }
    }
}

/// A single session's sweep arrays, pre-parsed and resident in memory.
///
/// All per-sweep vectors run in parallel and share sweep order; sweeps
/// are totally ordered by position and `start_times` is non-decreasing
/// in that order. `samples` holds one waveform per sweep (the source
/// matrix is time x sweep; callers hand over its columns).
#[derive(Debug, Clone)]
pub struct SweepSet {
    /// Session-assigned sweep ids (source frame numbers)
    pub ids: Vec<i64>,
    /// Short label per sweep; the first character is semantically significant
    pub labels: Vec<String>,
    /// Declared data points per sweep
    pub point_counts: Vec<usize>,
    /// Sweep start times in seconds, non-decreasing
    pub start_times: Vec<f64>,
    /// Raw state codes per sweep
    pub state_codes: Vec<i64>,
    /// One waveform per sweep, length equal to the declared point count
    pub samples: Vec<Vec<f64>>,
    /// Sampling interval in seconds; the sampling rate is its reciprocal
    pub sampling_interval: f64,
}

impl SweepSet {
    /// Number of sweeps in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the session holds no sweeps at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Session sampling rate in Hz.
    #[must_use]
    pub fn sampling_rate(&self) -> f64 {
        1.0 / self.sampling_interval
    }

    /// Check every precondition the pipeline relies on.
    ///
    /// Detected before segmentation begins so that no partial entities
    /// are ever produced from an inconsistent session.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptySession`] for fewer than 2 sweeps
    /// * [`Error::LengthMismatch`] if any per-sweep array disagrees in
    ///   length with the label array
    /// * [`Error::PointCountMismatch`] if a waveform's length disagrees
    ///   with its declared point count
    /// * [`Error::InvalidSamplingInterval`] for a non-positive or
    ///   non-finite sampling interval
    pub fn validate(&self) -> Result<()> {
        let n = self.labels.len();
        if n < 2 {
            return Err(Error::EmptySession(n));
        }
        for (field, actual) in [
            ("ids", self.ids.len()),
            ("point_counts", self.point_counts.len()),
            ("start_times", self.start_times.len()),
            ("state_codes", self.state_codes.len()),
            ("samples", self.samples.len()),
        ] {
            if actual != n {
                return Err(Error::LengthMismatch {
                    field,
                    expected: n,
                    actual,
                });
            }
        }
        if !self.sampling_interval.is_finite() || self.sampling_interval <= 0.0 {
            return Err(Error::InvalidSamplingInterval(self.sampling_interval));
        }
        for (sweep, waveform) in self.samples.iter().enumerate() {
            if waveform.len() != self.point_counts[sweep] {
                return Err(Error::PointCountMismatch {
                    sweep,
                    expected: self.point_counts[sweep],
                    actual: waveform.len(),
                });
            }
        }
        Ok(())
    }

    /// Borrowed view of one sweep's metadata and waveform.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; callers iterate within
    /// `0..self.len()`.
    #[must_use]
    pub fn sweep(&self, index: usize) -> SweepView<'_> {
        SweepView {
            index,
            id: self.ids[index],
            label: &self.labels[index],
            points: self.point_counts[index],
            start_time: self.start_times[index],
            state_code: self.state_codes[index],
            samples: &self.samples[index],
        }
    }

    /// Iterate over per-sweep views in session order.
    pub fn iter(&self) -> impl Iterator<Item = SweepView<'_>> {
        (0..self.len()).map(|i| self.sweep(i))
    }
}

/// One sweep's slice of the session arrays.
#[derive(Debug, Clone, Copy)]
pub struct SweepView<'a> {
    /// 0-based position in the session
    pub index: usize,
    /// Session-assigned sweep id
    pub id: i64,
    /// Sweep label from the source metadata
    pub label: &'a str,
    /// Declared data points
    pub points: usize,
    /// Start time in seconds
    pub start_time: f64,
    /// Raw state code
    pub state_code: i64,
    /// Raw (unscaled) waveform
    pub samples: &'a [f64],
}
