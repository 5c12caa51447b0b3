//! Session Record - flat metadata of one recording session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session Record holds the flat descriptive metadata of one session.
///
/// Pure field copying into the persistence model; nothing here is
/// derived from the recorded data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    session_id: String,
    description: String,
    start_time: DateTime<Utc>,
    experimenter: Option<String>,
    institution: Option<String>,
    lab: Option<String>,
    related_publications: Option<String>,
    experiment_description: Option<String>,
    notes: Option<String>,
}

impl SessionRecord {
    /// Create a new session record with the required fields.
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            description: description.into(),
            start_time,
            experimenter: None,
            institution: None,
            lab: None,
            related_publications: None,
            experiment_description: None,
            notes: None,
        }
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(
        session_id: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> SessionRecordBuilder {
        SessionRecordBuilder::new(session_id, description, start_time)
    }

    /// Get the session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the session description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the session start time.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Get the experimenter initials, if set.
    #[must_use]
    pub fn experimenter(&self) -> Option<&str> {
        self.experimenter.as_deref()
    }

    /// Get the institution, if set.
    #[must_use]
    pub fn institution(&self) -> Option<&str> {
        self.institution.as_deref()
    }

    /// Get the lab name, if set.
    #[must_use]
    pub fn lab(&self) -> Option<&str> {
        self.lab.as_deref()
    }

    /// Get the related publications, if set.
    #[must_use]
    pub fn related_publications(&self) -> Option<&str> {
        self.related_publications.as_deref()
    }

    /// Get the experiment description, if set.
    #[must_use]
    pub fn experiment_description(&self) -> Option<&str> {
        self.experiment_description.as_deref()
    }

    /// Get the free-text session notes, if set.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Builder for `SessionRecord`.
#[derive(Debug)]
pub struct SessionRecordBuilder {
    record: SessionRecord,
}

impl SessionRecordBuilder {
    /// Create a new builder with the required fields.
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            record: SessionRecord::new(session_id, description, start_time),
        }
    }

    /// Set the experimenter initials.
    #[must_use]
    pub fn experimenter(mut self, experimenter: impl Into<String>) -> Self {
        self.record.experimenter = Some(experimenter.into());
        self
    }

    /// Set the institution.
    #[must_use]
    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.record.institution = Some(institution.into());
        self
    }

    /// Set the lab name.
    #[must_use]
    pub fn lab(mut self, lab: impl Into<String>) -> Self {
        self.record.lab = Some(lab.into());
        self
    }

    /// Set the related publications.
    #[must_use]
    pub fn related_publications(mut self, publications: impl Into<String>) -> Self {
        self.record.related_publications = Some(publications.into());
        self
    }

    /// Set the experiment description.
    #[must_use]
    pub fn experiment_description(mut self, description: impl Into<String>) -> Self {
        self.record.experiment_description = Some(description.into());
        self
    }

    /// Set the free-text session notes.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.record.notes = Some(notes.into());
        self
    }

    /// Build the `SessionRecord`.
    #[must_use]
    pub fn build(self) -> SessionRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_record_required_fields() {
        let start = Utc.with_ymd_and_hms(2018, 1, 26, 0, 0, 0).unwrap();
        let record = SessionRecord::new("180126__s1c1", "Plasticity protocol recording", start);
        assert_eq!(record.session_id(), "180126__s1c1");
        assert_eq!(record.start_time(), start);
        assert!(record.lab().is_none());
    }

    #[test]
    fn test_session_record_builder() {
        let start = Utc.with_ymd_and_hms(2018, 1, 26, 0, 0, 0).unwrap();
        let record = SessionRecord::builder("180126__s1c1", "desc", start)
            .experimenter("MU")
            .institution("University of Bristol")
            .lab("Jack Mellor lab")
            .build();
        assert_eq!(record.experimenter(), Some("MU"));
        assert_eq!(record.lab(), Some("Jack Mellor lab"));
        assert!(record.notes().is_none());
    }
}
