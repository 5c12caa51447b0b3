//! Subject Record - animal metadata for one session

use serde::{Deserialize, Serialize};

/// Subject Record holds the animal metadata attached to a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectRecord {
    subject_id: String,
    species: String,
    sex: String,
    age: Option<String>,
    strain: Option<String>,
    description: Option<String>,
}

impl SubjectRecord {
    /// Create a new subject record with the required fields.
    #[must_use]
    pub fn new(
        subject_id: impl Into<String>,
        species: impl Into<String>,
        sex: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            species: species.into(),
            sex: sex.into(),
            age: None,
            strain: None,
            description: None,
        }
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(
        subject_id: impl Into<String>,
        species: impl Into<String>,
        sex: impl Into<String>,
    ) -> SubjectRecordBuilder {
        SubjectRecordBuilder::new(subject_id, species, sex)
    }

    /// ISO 8601 duration string for an age in days, e.g. 34 -> "P34D".
    #[must_use]
    pub fn age_from_days(days: u32) -> String {
        format!("P{days}D")
    }

    /// Get the subject identifier.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Get the species.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Get the sex.
    #[must_use]
    pub fn sex(&self) -> &str {
        &self.sex
    }

    /// Get the ISO 8601 age, if set.
    #[must_use]
    pub fn age(&self) -> Option<&str> {
        self.age.as_deref()
    }

    /// Get the strain, if set.
    #[must_use]
    pub fn strain(&self) -> Option<&str> {
        self.strain.as_deref()
    }

    /// Get the description (animal testing order), if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Builder for `SubjectRecord`.
#[derive(Debug)]
pub struct SubjectRecordBuilder {
    record: SubjectRecord,
}

impl SubjectRecordBuilder {
    /// Create a new builder with the required fields.
    #[must_use]
    pub fn new(
        subject_id: impl Into<String>,
        species: impl Into<String>,
        sex: impl Into<String>,
    ) -> Self {
        Self {
            record: SubjectRecord::new(subject_id, species, sex),
        }
    }

    /// Set the ISO 8601 age string.
    #[must_use]
    pub fn age(mut self, age: impl Into<String>) -> Self {
        self.record.age = Some(age.into());
        self
    }

    /// Set the strain.
    #[must_use]
    pub fn strain(mut self, strain: impl Into<String>) -> Self {
        self.record.strain = Some(strain.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = Some(description.into());
        self
    }

    /// Build the `SubjectRecord`.
    #[must_use]
    pub fn build(self) -> SubjectRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_record_creation() {
        let record = SubjectRecord::new("180126", "Mus musculus", "F");
        assert_eq!(record.subject_id(), "180126");
        assert_eq!(record.species(), "Mus musculus");
        assert!(record.age().is_none());
    }

    #[test]
    fn test_age_from_days() {
        assert_eq!(SubjectRecord::age_from_days(34), "P34D");
        assert_eq!(SubjectRecord::age_from_days(120), "P120D");
    }

    #[test]
    fn test_subject_record_builder() {
        let record = SubjectRecord::builder("180126", "Mus musculus", "F")
            .age(SubjectRecord::age_from_days(34))
            .strain("Ai32/PVcre")
            .description("001")
            .build();
        assert_eq!(record.age(), Some("P34D"));
        assert_eq!(record.strain(), Some("Ai32/PVcre"));
        assert_eq!(record.description(), Some("001"));
    }
}
