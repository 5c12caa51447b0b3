//! # icephys-convert: patch-clamp session conversion
//!
//! Converts a single session of intracellular electrophysiology
//! recordings (voltage-clamp and current-clamp sweeps interleaved with
//! optogenetic/electrical stimulation) into a standardized,
//! hierarchically indexed data model.
//!
//! The pipeline is one forward pass over already-loaded arrays:
//!
//! ```text
//! raw arrays -> run segmentation -> series pairs -> grouping hierarchy
//!                                                       -> SessionStore
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use icephys_convert::hierarchy::{ConditionLayout, ConditionSpec};
//! use icephys_convert::session::SessionRecord;
//! use icephys_convert::sweeps::SweepSet;
//! use icephys_convert::{Converter, SessionMetadata};
//!
//! let sweeps = SweepSet {
//!     ids: (1..=6).collect(),
//!     labels: ["1", "1", "b", "0", "0", "1"].iter().map(|s| s.to_string()).collect(),
//!     point_counts: vec![3; 6],
//!     start_times: (0..6).map(|i| f64::from(i) * 5.0).collect(),
//!     state_codes: vec![0, 1, 9, 2, 2, 0],
//!     samples: vec![vec![0.0, 1.0, -1.0]; 6],
//!     sampling_interval: 5e-5,
//! };
//!
//! // Runs: baseline(0-1), break(2), plasticity(3-4), baseline(5).
//! let layout = ConditionLayout::new(vec![
//!     ConditionSpec::new("baselineStim", vec![0, 3]),
//!     ConditionSpec::new("noStim", vec![1]),
//!     ConditionSpec::new("plasticityInduction", vec![2]),
//! ]);
//!
//! let converter = Converter::builder().condition_layout(layout).build();
//! let session = SessionRecord::new("180126__s1c1", "Plasticity protocol", Utc::now());
//! let store = converter.convert(&sweeps, SessionMetadata::new(session))?;
//!
//! assert_eq!(store.series_count(), 6);
//! assert_eq!(store.hierarchy().unwrap().repetitions.len(), 4);
//! # Ok::<(), icephys_convert::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod convert;
pub mod error;
pub mod hierarchy;
pub mod segment;
pub mod series;
pub mod session;
pub mod sweeps;

pub use convert::SessionMetadata;
pub use error::{Error, Result};

use hierarchy::ConditionLayout;
use series::ScaleFactors;
use session::SessionStore;
use sweeps::SweepSet;

/// Session converter holding the session-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    scales: ScaleFactors,
    layout: ConditionLayout,
}

impl Converter {
    /// Create a new converter builder.
    #[must_use]
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    /// Run the full conversion over one session.
    ///
    /// # Errors
    ///
    /// Propagates every data-quality error of the pipeline; see
    /// [`convert::convert_session`].
    pub fn convert(&self, sweeps: &SweepSet, metadata: SessionMetadata) -> Result<SessionStore> {
        convert::convert_session(sweeps, metadata, &self.layout, &self.scales)
    }
}

/// Builder for [`Converter`].
#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
    scales: ScaleFactors,
    layout: ConditionLayout,
}

impl ConverterBuilder {
    /// Set the session-wide amplitude scale factors.
    #[must_use]
    pub fn scale_factors(mut self, scales: ScaleFactors) -> Self {
        self.scales = scales;
        self
    }

    /// Set the experimental-condition layout.
    ///
    /// The layout is design metadata and must exactly partition the
    /// session's repetitions; it is validated during conversion.
    #[must_use]
    pub fn condition_layout(mut self, layout: ConditionLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Build the converter.
    #[must_use]
    pub fn build(self) -> Converter {
        Converter {
            scales: self.scales,
            layout: self.layout,
        }
    }
}
