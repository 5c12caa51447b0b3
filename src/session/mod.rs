//! Session export model
//!
//! This module models the persistence collaborator that receives the
//! entities the conversion core produces: flat session/subject/device
//! metadata records plus the recording table, sweep-metadata side
//! table, and the four grouping tables.
//!
//! ## Schema overview
//!
//! ```text
//! SessionStore
//!   ├── SessionRecord / SubjectRecord / DeviceRecord / ElectrodeRecord
//!   ├── series pairs (1 per sweep) ──< recording rows (1 per sweep)
//!   ├── sweep-metadata side table (1 row per sweep)
//!   └── Hierarchy
//!         SimultaneousGroup ──< SequentialGroup ──< RepetitionGroup
//!                                                     ──< ConditionGroup
//! ```
//!
//! The store is append-only during the conversion pass and read-only
//! afterwards; the actual container byte layout is owned by the
//! downstream data-model library, which consumes the JSON snapshot or
//! walks the tables directly.

mod device_record;
mod session_record;
mod store;
mod subject_record;

pub use device_record::{DeviceRecord, ElectrodeRecord};
pub use session_record::{SessionRecord, SessionRecordBuilder};
pub use store::{RecordingRow, SessionStore, SweepRow};
pub use subject_record::{SubjectRecord, SubjectRecordBuilder};
