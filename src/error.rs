//! Error types for icephys-convert
//!
//! Every error here is fatal for the whole conversion: the run
//! classification and state tags are load-bearing for all downstream
//! grouping tables, so a session either converts completely or not at
//! all.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// icephys-convert error types
#[derive(Error, Debug)]
pub enum Error {
    /// Sweep label leading character outside the recognized alphabet
    #[error("Malformed sweep label {label:?} at sweep {sweep}\nRun classification recognizes labels starting with 'b' (break), '0' (plasticity), or '1' (baseline)")]
    MalformedLabel {
        /// 0-based position of the offending sweep
        sweep: usize,
        /// The full label as found in the source metadata
        label: String,
    },

    /// State code outside the recognized set {0, 1, 2, 9}
    #[error("Unmapped stimulus state {state} at sweep {sweep}\nRecognized states: 0 (light), 1 (current), 2 (combined), 9 (break)")]
    UnmappedState {
        /// 0-based position of the offending sweep
        sweep: usize,
        /// The raw state code
        state: i64,
    },

    /// Baseline run sweep carrying a state that has no baseline annotation
    #[error("State {state} at sweep {sweep} has no baseline stimulus annotation\nBaseline runs only describe light (0) and current (1) stimulation")]
    UnsupportedBaselineState {
        /// 0-based position of the offending sweep
        sweep: usize,
        /// The raw state code
        state: i64,
    },

    /// Per-sweep metadata arrays disagree in length
    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array
        field: &'static str,
        /// Length of the reference array (sweep labels)
        expected: usize,
        /// Actual length found
        actual: usize,
    },

    /// A sweep's waveform length disagrees with its declared point count
    #[error("Sweep {sweep} declares {expected} data points but its waveform holds {actual} samples")]
    PointCountMismatch {
        /// 0-based position of the offending sweep
        sweep: usize,
        /// Declared point count
        expected: usize,
        /// Actual waveform length
        actual: usize,
    },

    /// Fewer than 2 sweeps; boundary detection needs at least one comparison
    #[error("Session holds {0} sweep(s); at least 2 are required for run boundary detection")]
    EmptySession(usize),

    /// Sampling interval must be a positive, finite number of seconds
    #[error("Invalid sampling interval {0} s; the sampling rate is its reciprocal and must be positive and finite")]
    InvalidSamplingInterval(f64),

    /// Experimental-condition layout does not partition the repetition table
    #[error("Invalid condition layout: {0}")]
    InvalidLayout(String),

    /// Store snapshot serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
