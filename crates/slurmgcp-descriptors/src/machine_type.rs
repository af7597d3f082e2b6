//! Machine type descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DescriptorError, DescriptorResult};

/// Accelerators attached to a machine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceleratorInfo {
    #[serde(rename = "type")]
    pub accelerator_type: String,
    pub count: u32,
}

/// Shape of a Compute Engine machine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineType {
    pub name: String,
    pub guest_cpus: u32,
    pub memory_mb: u64,
    pub accelerators: Vec<AcceleratorInfo>,
}

// Wire shape of `compute#machineType`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineTypeRecord {
    name: String,
    guest_cpus: u32,
    memory_mb: u64,
    #[serde(default)]
    accelerators: Option<Vec<AcceleratorRecord>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceleratorRecord {
    guest_accelerator_type: String,
    guest_accelerator_count: u32,
}

impl From<MachineTypeRecord> for MachineType {
    fn from(r: MachineTypeRecord) -> Self {
        Self {
            name: r.name,
            guest_cpus: r.guest_cpus,
            memory_mb: r.memory_mb,
            accelerators: r
                .accelerators
                .unwrap_or_default()
                .into_iter()
                .map(|a| AcceleratorInfo {
                    accelerator_type: a.guest_accelerator_type,
                    count: a.guest_accelerator_count,
                })
                .collect(),
        }
    }
}

impl MachineType {
    pub fn from_json(value: &Value) -> DescriptorResult<Self> {
        MachineTypeRecord::deserialize(value)
            .map(Self::from)
            .map_err(|source| DescriptorError::InvalidRecord {
                kind: "machine type",
                source,
            })
    }

    /// Machine family, e.g. `a2` for `a2-highgpu-1g`.
    pub fn family(&self) -> &str {
        self.name.split('-').next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_machine_type_with_accelerator() {
        let jo = json!({
            "accelerators": [{ "guestAcceleratorCount": 1, "guestAcceleratorType": "nvidia-tesla-a100" }],
            "creationTimestamp": "1969-12-31T16:00:00.000-08:00",
            "description": "Accelerator Optimized: 1 NVIDIA Tesla A100 GPU, 12 vCPUs, 85GB RAM",
            "guestCpus": 12,
            "id": "1000012",
            "imageSpaceGb": 0,
            "isSharedCpu": false,
            "kind": "compute#machineType",
            "maximumPersistentDisks": 128,
            "maximumPersistentDisksSizeGb": "263168",
            "memoryMb": 87040,
            "name": "a2-highgpu-1g",
            "selfLink": "https://www.googleapis.com/compute/v1/projects/io-playground/zones/us-central1-a/machineTypes/a2-highgpu-1g",
            "zone": "us-central1-a"
        });
        let want = MachineType {
            name: "a2-highgpu-1g".to_string(),
            guest_cpus: 12,
            memory_mb: 87040,
            accelerators: vec![AcceleratorInfo {
                accelerator_type: "nvidia-tesla-a100".to_string(),
                count: 1,
            }],
        };
        let got = MachineType::from_json(&jo).unwrap();
        assert_eq!(got, want);
        assert_eq!(got.family(), "a2");
    }

    #[test]
    fn test_machine_type_without_accelerators() {
        let jo = json!({
            "architecture": "X86_64",
            "guestCpus": 8,
            "kind": "compute#machineType",
            "memoryMb": 32768,
            "name": "t2d-standard-8",
            "zone": "europe-north2-b"
        });
        let got = MachineType::from_json(&jo).unwrap();
        assert_eq!(got.name, "t2d-standard-8");
        assert_eq!(got.guest_cpus, 8);
        assert_eq!(got.memory_mb, 32768);
        assert!(got.accelerators.is_empty());
    }

    #[test]
    fn test_machine_type_missing_required_field() {
        let jo = json!({ "name": "n2-standard-2", "guestCpus": 2 });
        assert!(matches!(
            MachineType::from_json(&jo),
            Err(DescriptorError::InvalidRecord { kind: "machine type", .. })
        ));
    }
}
