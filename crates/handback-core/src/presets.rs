//! Option preset management
//!
//! Load, save, and list named verification option presets as YAML files.
//! The two built-in presets (`continuous`, `discrete`) mirror the observed
//! pipeline parameter sets and need no file on disk.

use std::path::{Path, PathBuf};

use crate::models::VerifyOptions;

/// Validate a preset name to prevent path traversal attacks.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_preset_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Preset name cannot be empty".to_string());
    }

    if name.contains('/') || name.contains('\\') {
        return Err("Preset name cannot contain path separators".to_string());
    }

    if name.contains("..") {
        return Err("Preset name cannot contain '..'".to_string());
    }

    if name.starts_with('.') {
        return Err("Preset name cannot start with '.'".to_string());
    }

    if name.contains('\0') {
        return Err("Preset name cannot contain null bytes".to_string());
    }

    Ok(())
}

/// Load verification options from a YAML preset file
pub fn load_preset<P: AsRef<Path>>(path: P) -> Result<VerifyOptions, String> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read preset file: {}", e))?;

    let mut options: VerifyOptions = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse preset YAML: {}", e))?;
    options.sanitize();
    Ok(options)
}

/// Save verification options to a YAML preset file
pub fn save_preset<P: AsRef<Path>>(options: &VerifyOptions, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let yaml =
        serde_yaml::to_string(options).map_err(|e| format!("Failed to serialize preset: {}", e))?;

    std::fs::write(path, yaml).map_err(|e| format!("Failed to write preset file: {}", e))
}

/// Resolve a preset by name: built-ins first, then YAML files in the
/// presets directory
pub fn resolve_preset(name: &str) -> Result<VerifyOptions, String> {
    if let Some(options) = VerifyOptions::builtin(name) {
        return Ok(options);
    }

    validate_preset_name(name)?;
    let dir = get_presets_dir()?;
    let path = dir.join(format!("{}.yml", name));
    if !path.exists() {
        return Err(format!(
            "Unknown preset '{}': not a built-in and {} does not exist",
            name,
            path.display()
        ));
    }
    load_preset(&path)
}

/// List all preset names available in a directory
pub fn list_presets<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, String> {
    let dir = dir.as_ref();
    let mut presets = Vec::new();

    let entries =
        std::fs::read_dir(dir).map_err(|e| format!("Failed to read presets directory: {}", e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) == Some("yml")
            || path.extension().and_then(|e| e.to_str()) == Some("yaml")
        {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                presets.push(name.to_string());
            }
        }
    }

    presets.sort();
    Ok(presets)
}

/// Get the default presets directory
pub fn get_presets_dir() -> Result<PathBuf, String> {
    let home_dir = dirs::home_dir().ok_or_else(|| "Could not find home directory".to_string())?;
    Ok(home_dir.join(".handback").join("presets"))
}
