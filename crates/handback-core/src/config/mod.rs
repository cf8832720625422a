//! Engine configuration management.
//!
//! Provides configuration loading, the global verbose flag, and the
//! on-disk defaults that seed [`VerifyOptions`](crate::models::VerifyOptions)
//! when the caller does not override a value.

mod defaults;

pub use defaults::EngineDefaults;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::Deserialize;

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["handback.yml", "handback.yaml"];

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct EngineConfigHandle {
    pub config: EngineConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl EngineConfigHandle {
    fn with_config(config: EngineConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: EngineDefaults,
}

impl EngineConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }
}

/// Load configuration from disk, optionally forcing a specific path.
pub fn load_engine_config(custom_path: Option<&Path>) -> EngineConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<EngineConfig>(&contents) {
                Ok(config) => {
                    let sanitized = config.sanitize();
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return EngineConfigHandle::with_config(sanitized, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse engine config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read engine config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No engine config found; using built-in defaults.".to_string());
    EngineConfigHandle::with_config(EngineConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("HANDBACK_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join(".handback").join(name));
        }
    }

    candidates
}

static ENGINE_CONFIG_HANDLE: OnceLock<EngineConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global engine configuration (loaded once per process).
pub fn engine_config_handle() -> &'static EngineConfigHandle {
    ENGINE_CONFIG_HANDLE.get_or_init(|| load_engine_config(None))
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = engine_config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[handback] Loaded engine config from {}", source.display());
        } else {
            eprintln!("[handback] Using built-in engine defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[handback] Config warning: {}", warning);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let handle = load_engine_config(Some(Path::new("/nonexistent/handback.yml")));
        assert!(handle.source.is_none());
        assert!(!handle.warnings.is_empty());
        assert!((handle.config.defaults.severity_threshold - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = std::env::temp_dir().join("handback-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("handback.yml");
        std::fs::write(&path, "defaults:\n  severity_threshold: 15.0\n").unwrap();

        let handle = load_engine_config(Some(&path));
        assert!(handle.source.is_some());
        assert!((handle.config.defaults.severity_threshold - 15.0).abs() < 1e-6);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bad_config_warns_and_falls_back() {
        let dir = std::env::temp_dir().join("handback-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.yml");
        std::fs::write(&path, "defaults: [not, a, mapping]\n").unwrap();

        let handle = load_engine_config(Some(&path));
        assert!(handle
            .warnings
            .iter()
            .any(|w| w.contains("Failed to parse")));

        std::fs::remove_file(&path).ok();
    }
}
