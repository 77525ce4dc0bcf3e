use crate::error::Error;
use crate::paths;
use crate::target::Target;
use crate::Result;
use std::path::Path;

/// Read and parse a target config file.
pub(crate) fn load(id: &str) -> Result<Target> {
    let path = paths::target(id)?;

    if !path.exists() {
        return Err(Error::target_not_found(id));
    }

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| Error::internal_io(e.to_string(), Some("read target config".to_string())))?;

    let mut target: Target = serde_json::from_str(&raw)
        .map_err(|e| Error::config_invalid_json(path.to_string_lossy().to_string(), e))?;
    target.id = id.to_string();

    Ok(target)
}

/// Write a target config file, creating the targets directory if needed.
pub(crate) fn save(target: &Target) -> Result<()> {
    let path = paths::target(&target.id)?;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let payload = serde_json::to_string_pretty(target)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize target".to_string())))?;

    std::fs::write(&path, payload)
        .map_err(|e| Error::internal_io(e.to_string(), Some("write target config".to_string())))
}

/// List all saved targets, sorted by id.
pub(crate) fn list() -> Result<Vec<Target>> {
    let dir = paths::targets()?;

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir)
        .map_err(|e| Error::internal_io(e.to_string(), Some("read targets dir".to_string())))?;

    let mut targets = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some("read targets dir entry".to_string()))
        })?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        targets.push(load(id)?);
    }

    targets.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(targets)
}

pub(crate) fn delete(id: &str) -> Result<()> {
    let path = paths::target(id)?;

    if !path.exists() {
        return Err(Error::target_not_found(id));
    }

    std::fs::remove_file(&path)
        .map_err(|e| Error::internal_io(e.to_string(), Some("delete target config".to_string())))
}

pub(crate) fn exists(id: &str) -> bool {
    paths::target(id).map(|p| p.exists()).unwrap_or(false)
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::internal_io(e.to_string(), Some("create config dir".to_string())))
}
