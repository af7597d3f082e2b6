//! `slurmgcp describe`: typed views of raw Compute Engine records.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use slurmgcp_descriptors::{InstanceResourceStatus, MachineType};

fn read_record(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub fn machine_type(path: &str) -> Result<()> {
    let record = read_record(Path::new(path))?;
    let machine = MachineType::from_json(&record)?;
    println!("{}", serde_json::to_string_pretty(&machine)?);
    Ok(())
}

/// Accepts either a bare `resourceStatus` record or a whole instance.
pub fn instance_status(path: &str) -> Result<()> {
    let record = read_record(Path::new(path))?;
    let status = InstanceResourceStatus::from_json(Some(resource_status(&record)));
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn resource_status(record: &Value) -> &Value {
    record.get("resourceStatus").unwrap_or(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_read_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mt.json");
        fs::write(&path, r#"{"name": "n2-standard-4", "guestCpus": 4, "memoryMb": 16384}"#).unwrap();

        let record = read_record(&path).unwrap();
        let machine = MachineType::from_json(&record).unwrap();
        assert_eq!(machine.guest_cpus, 4);
        assert!(machine.accelerators.is_empty());
    }

    #[test]
    fn test_read_record_not_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        assert!(read_record(&path).is_err());
        assert!(read_record(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_resource_status_from_instance() {
        let instance = json!({ "name": "c-n-0", "resourceStatus": { "physicalHost": "/a/b" } });
        let status = InstanceResourceStatus::from_json(Some(resource_status(&instance)));
        assert_eq!(status.physical_host.as_deref(), Some("/a/b"));

        let bare = json!({ "physicalHost": "/a/b" });
        assert_eq!(resource_status(&bare), &bare);
    }
}
