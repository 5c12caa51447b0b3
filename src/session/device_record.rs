//! Device and electrode records

use serde::{Deserialize, Serialize};

/// Recording device (amplifier) metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    name: String,
    description: String,
    manufacturer: String,
}

impl DeviceRecord {
    /// Create a new device record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            manufacturer: manufacturer.into(),
        }
    }

    /// Get the device name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the device description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the manufacturer.
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }
}

/// Intracellular electrode metadata, tied to a device by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElectrodeRecord {
    name: String,
    description: String,
    location: String,
    slice_label: String,
    device_name: String,
}

impl ElectrodeRecord {
    /// Create a new electrode record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        slice_label: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            location: location.into(),
            slice_label: slice_label.into(),
            device_name: device_name.into(),
        }
    }

    /// Get the electrode name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the electrode description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the anatomical recording location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Get the slice label, e.g. "slice #1".
    #[must_use]
    pub fn slice_label(&self) -> &str {
        &self.slice_label
    }

    /// Get the name of the device this electrode is attached to.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_record() {
        let device = DeviceRecord::new(
            "Amplifier_Multiclamp_700A",
            "Amplifier for recording intracellular data.",
            "Molecular Devices",
        );
        assert_eq!(device.name(), "Amplifier_Multiclamp_700A");
        assert_eq!(device.manufacturer(), "Molecular Devices");
    }

    #[test]
    fn test_electrode_references_device_by_name() {
        let device = DeviceRecord::new("amp", "desc", "maker");
        let electrode = ElectrodeRecord::new(
            "icephys_electrode",
            "A patch clamp electrode",
            "Cell soma in CA1 of hippocampus",
            "slice #1",
            device.name(),
        );
        assert_eq!(electrode.device_name(), device.name());
        assert_eq!(electrode.slice_label(), "slice #1");
    }
}
