//! Stimulus/response series construction
//!
//! Builds the (stimulus, response) pair for one sweep: applies the
//! clamp-appropriate amplitude scale, derives the zero-padded series
//! name, and selects the condition/state-dependent descriptions. The
//! response waveform is reused verbatim as the stimulus waveform
//! because no separate command trace is recorded in this protocol.

use serde::{Deserialize, Serialize};

use crate::segment::{RecordingUnit, RunKind};
use crate::sweeps::StimulusState;
use crate::{Error, Result};

/// Default voltage-clamp scale: raw units to amperes.
pub const VOLTAGE_CLAMP_SCALE: f64 = 1.0 / 10e12;

/// Default current-clamp scale: raw units to volts.
pub const CURRENT_CLAMP_SCALE: f64 = 2.5 / 10e5;

/// Fixed amplifier gain recorded on every series.
const GAIN: f64 = 1.0;

/// Clamp configuration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampMode {
    /// Holds membrane voltage, measures current (baseline and break runs)
    VoltageClamp,
    /// Injects current, measures voltage (plasticity runs)
    CurrentClamp,
}

impl ClampMode {
    /// Clamp mode used for a given run kind.
    #[must_use]
    pub const fn for_run(kind: RunKind) -> Self {
        match kind {
            RunKind::Baseline | RunKind::Break => Self::VoltageClamp,
            RunKind::Plasticity => Self::CurrentClamp,
        }
    }

    /// Unit of the clamp's command waveform.
    ///
    /// A voltage clamp commands a voltage; a current clamp commands a
    /// current. The stimulus series always carries this unit while the
    /// response series carries the run's measured unit.
    #[must_use]
    pub const fn command_unit(self) -> RecordingUnit {
        match self {
            Self::VoltageClamp => RecordingUnit::Volts,
            Self::CurrentClamp => RecordingUnit::Amperes,
        }
    }
}

/// Session-wide amplitude scale factors, raw units to SI.
///
/// These are constants of the recording rig, not per-sweep values;
/// override them on the [`Converter`](crate::Converter) builder when a
/// session was recorded with different amplifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    /// Applied to voltage-clamp (baseline/break) run samples
    pub voltage_clamp: f64,
    /// Applied to current-clamp (plasticity) run samples
    pub current_clamp: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            voltage_clamp: VOLTAGE_CLAMP_SCALE,
            current_clamp: CURRENT_CLAMP_SCALE,
        }
    }
}

impl ScaleFactors {
    /// Scale factor for the given clamp mode.
    #[must_use]
    pub const fn for_mode(&self, mode: ClampMode) -> f64 {
        match mode {
            ClampMode::VoltageClamp => self.voltage_clamp,
            ClampMode::CurrentClamp => self.current_clamp,
        }
    }
}

/// Typed per-sweep input to the series builder.
///
/// Replaces the dynamic dictionary the source passed between steps:
/// every field is required, and the clamp mode is derived from the run
/// kind rather than from key presence.
#[derive(Debug, Clone)]
pub struct SweepInput {
    /// 0-based sweep position, for diagnostics
    pub index: usize,
    /// 1-based session-relative order, used for naming
    pub order: usize,
    /// Session-assigned sweep id, recorded as the sweep number
    pub sweep_id: i64,
    /// Run classification of the owning run
    pub kind: RunKind,
    /// Stimulation state of this sweep
    pub state: StimulusState,
    /// Measured unit of the owning run
    pub unit: RecordingUnit,
    /// Session sampling rate in Hz
    pub sampling_rate: f64,
    /// Sweep start time in seconds
    pub start_time: f64,
    /// Raw (unscaled) waveform
    pub data: Vec<f64>,
}

/// One series of a stimulus/response pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingSeries {
    name: String,
    description: &'static str,
    stimulus_description: &'static str,
    data: Vec<f64>,
    gain: f64,
    unit: RecordingUnit,
    starting_time: f64,
    rate: f64,
    sweep_number: i64,
}

impl RecordingSeries {
    /// Series name, "PatchClampSeries" + zero-padded order.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Condition description text.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Stimulus description text.
    #[must_use]
    pub const fn stimulus_description(&self) -> &'static str {
        self.stimulus_description
    }

    /// Scaled waveform.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Amplifier gain (fixed at 1.0).
    #[must_use]
    pub const fn gain(&self) -> f64 {
        self.gain
    }

    /// Physical unit of the waveform.
    #[must_use]
    pub const fn unit(&self) -> RecordingUnit {
        self.unit
    }

    /// Time of the first sample in seconds.
    #[must_use]
    pub const fn starting_time(&self) -> f64 {
        self.starting_time
    }

    /// Sampling rate in Hz.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Absolute sweep id this series belongs to.
    #[must_use]
    pub const fn sweep_number(&self) -> i64 {
        self.sweep_number
    }
}

/// The stimulus/response representation of one sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPair {
    /// Command-side series, carrying the clamp-control unit
    pub stimulus: RecordingSeries,
    /// Measured-side series, carrying the run's unit
    pub response: RecordingSeries,
}

/// Derive the series name from the 1-based session-relative order.
///
/// Orders below 10 get two leading zeros, below 100 one, 100 and above
/// none.
#[must_use]
pub fn series_name(order: usize) -> String {
    format!("PatchClampSeries{order:03}")
}

fn annotate(
    index: usize,
    kind: RunKind,
    state: StimulusState,
) -> Result<(&'static str, &'static str)> {
    match kind {
        RunKind::Baseline => match state {
            StimulusState::Light => Ok((
                "Baseline condition: Light stimulation",
                "Baseline stimulation: Double light pulses.",
            )),
            StimulusState::Current => Ok((
                "Baseline condition: Current stimulation",
                "Baseline stimulation: Double current pulses.",
            )),
            _ => Err(Error::UnsupportedBaselineState {
                sweep: index,
                state: state.code(),
            }),
        },
        RunKind::Break => Ok((
            "Break sweeps are used while switching between two conditions: Nothing happens.",
            "No stimulation.",
        )),
        RunKind::Plasticity => Ok((
            "Plasticity condition",
            "Plasticity protocol: Simultaneous current and light stimulation",
        )),
    }
}

/// Build the (stimulus, response) pair for one sweep.
///
/// The raw waveform is multiplied once by the clamp-appropriate scale
/// factor; both series share the scaled data, the session sampling
/// rate, the sweep start time, unit gain, and the absolute sweep id.
///
/// # Errors
///
/// Returns [`Error::UnsupportedBaselineState`] for a baseline sweep
/// whose state is neither light nor current stimulation.
pub fn build_series_pair(input: SweepInput, scales: &ScaleFactors) -> Result<SeriesPair> {
    let mode = ClampMode::for_run(input.kind);
    let scale = scales.for_mode(mode);
    let (description, stimulus_description) = annotate(input.index, input.kind, input.state)?;

    let scaled: Vec<f64> = input.data.iter().map(|v| v * scale).collect();
    let name = series_name(input.order);

    let stimulus = RecordingSeries {
        name: name.clone(),
        description,
        stimulus_description,
        data: scaled.clone(),
        gain: GAIN,
        unit: mode.command_unit(),
        starting_time: input.start_time,
        rate: input.sampling_rate,
        sweep_number: input.sweep_id,
    };
    let response = RecordingSeries {
        name,
        description,
        stimulus_description,
        data: scaled,
        gain: GAIN,
        unit: input.unit,
        starting_time: input.start_time,
        rate: input.sampling_rate,
        sweep_number: input.sweep_id,
    };
    Ok(SeriesPair { stimulus, response })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: RunKind, state: StimulusState, order: usize) -> SweepInput {
        SweepInput {
            index: order - 1,
            order,
            sweep_id: order as i64 + 100,
            kind,
            state,
            unit: kind.unit(),
            sampling_rate: 20_000.0,
            start_time: 1.5,
            data: vec![1.0, -2.0, 4.0],
        }
    }

    #[test]
    fn test_name_zero_padding() {
        assert_eq!(series_name(7), "PatchClampSeries007");
        assert_eq!(series_name(42), "PatchClampSeries042");
        assert_eq!(series_name(123), "PatchClampSeries123");
    }

    #[test]
    fn test_voltage_clamp_scaling_and_units() {
        let pair =
            build_series_pair(input(RunKind::Baseline, StimulusState::Light, 1), &ScaleFactors::default())
                .unwrap();
        // Baseline runs are voltage clamp: volts command, amperes response.
        assert_eq!(pair.stimulus.unit(), RecordingUnit::Volts);
        assert_eq!(pair.response.unit(), RecordingUnit::Amperes);
        assert!((pair.response.data()[0] - VOLTAGE_CLAMP_SCALE).abs() < 1e-30);
        assert_eq!(pair.stimulus.data(), pair.response.data());
    }

    #[test]
    fn test_current_clamp_scaling_and_units() {
        let pair = build_series_pair(
            input(RunKind::Plasticity, StimulusState::Combined, 12),
            &ScaleFactors::default(),
        )
        .unwrap();
        assert_eq!(pair.stimulus.unit(), RecordingUnit::Amperes);
        assert_eq!(pair.response.unit(), RecordingUnit::Volts);
        assert!((pair.response.data()[2] - 4.0 * CURRENT_CLAMP_SCALE).abs() < 1e-18);
    }

    #[test]
    fn test_pair_shares_metadata() {
        let pair =
            build_series_pair(input(RunKind::Break, StimulusState::Break, 3), &ScaleFactors::default())
                .unwrap();
        assert_eq!(pair.stimulus.name(), "PatchClampSeries003");
        assert_eq!(pair.stimulus.name(), pair.response.name());
        assert_eq!(pair.stimulus.sweep_number(), pair.response.sweep_number());
        assert!((pair.stimulus.starting_time() - pair.response.starting_time()).abs() < f64::EPSILON);
        assert!((pair.stimulus.gain() - 1.0).abs() < f64::EPSILON);
        assert!((pair.response.rate() - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_baseline_annotations() {
        let light =
            build_series_pair(input(RunKind::Baseline, StimulusState::Light, 1), &ScaleFactors::default())
                .unwrap();
        assert_eq!(light.response.description(), "Baseline condition: Light stimulation");
        assert_eq!(
            light.response.stimulus_description(),
            "Baseline stimulation: Double light pulses."
        );

        let current = build_series_pair(
            input(RunKind::Baseline, StimulusState::Current, 2),
            &ScaleFactors::default(),
        )
        .unwrap();
        assert_eq!(current.response.description(), "Baseline condition: Current stimulation");
        assert_eq!(
            current.response.stimulus_description(),
            "Baseline stimulation: Double current pulses."
        );
    }

    #[test]
    fn test_break_and_plasticity_annotations_ignore_state() {
        let brk =
            build_series_pair(input(RunKind::Break, StimulusState::Light, 4), &ScaleFactors::default())
                .unwrap();
        assert_eq!(brk.response.stimulus_description(), "No stimulation.");

        let plast = build_series_pair(
            input(RunKind::Plasticity, StimulusState::Break, 5),
            &ScaleFactors::default(),
        )
        .unwrap();
        assert_eq!(plast.response.description(), "Plasticity condition");
    }

    #[test]
    fn test_baseline_with_foreign_state_is_fatal() {
        let err = build_series_pair(
            input(RunKind::Baseline, StimulusState::Combined, 6),
            &ScaleFactors::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedBaselineState { sweep: 5, state: 2 }));
    }

    #[test]
    fn test_scaling_is_deterministic() {
        let a = build_series_pair(
            input(RunKind::Plasticity, StimulusState::Combined, 9),
            &ScaleFactors::default(),
        )
        .unwrap();
        let b = build_series_pair(
            input(RunKind::Plasticity, StimulusState::Combined, 9),
            &ScaleFactors::default(),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_scale_factors() {
        let scales = ScaleFactors {
            voltage_clamp: 0.5,
            current_clamp: 2.0,
        };
        let pair =
            build_series_pair(input(RunKind::Baseline, StimulusState::Light, 1), &scales).unwrap();
        assert!((pair.response.data()[1] - (-1.0)).abs() < f64::EPSILON);
    }
}
