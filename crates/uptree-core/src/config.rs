//! Configuration module for uptree.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation and defaults, plus [`SyncConfig`], the
//! constructor surface of the sync engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::ports::path_matcher::GlobMatcher;

// ---------------------------------------------------------------------------
// File configuration
// ---------------------------------------------------------------------------

/// Top-level configuration for uptree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub sync: SyncSection,
    pub remote: RemoteSection,
    pub logging: LoggingSection,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSection {
    /// Root of the local tree to mirror.
    pub source: PathBuf,
    /// Directory holding persisted snapshot state between runs.
    pub state_dir: PathBuf,
    /// Include patterns passed to the matcher (empty means everything).
    #[serde(default)]
    pub includes: Vec<String>,
    /// Exclude patterns passed to the matcher.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Whether locally-removed paths are deleted remotely.
    pub delete_dest: bool,
    /// Whether to hash file content into snapshot fingerprints.
    pub fingerprint: bool,
}

/// Remote target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Client name, used in logs only.
    pub name: String,
    /// Base directory the local-directory client mirrors into.
    pub target: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/uptree/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("uptree")
            .join("config.yaml")
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            state_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("uptree")
                .join("state"),
            includes: Vec::new(),
            excludes: Vec::new(),
            delete_dest: true,
            fingerprint: false,
        }
    }
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            target: PathBuf::new(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.source"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.sync.source.exists() {
            errors.push(ValidationError {
                field: "sync.source".into(),
                message: format!("directory does not exist: {}", self.sync.source.display()),
            });
        }
        if self.sync.state_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "sync.state_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if let Err(err) = GlobMatcher::new(&self.sync.includes, &self.sync.excludes) {
            errors.push(ValidationError {
                field: "sync.includes/excludes".into(),
                message: err.to_string(),
            });
        }

        if self.remote.target.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "remote.target".into(),
                message: "must not be empty".into(),
            });
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Engine constructor surface
// ---------------------------------------------------------------------------

/// Per-pass settings consumed by the sync engine constructor.
///
/// Built from the file configuration plus command-line overrides, or
/// programmatically in tests. The chained `with_` setters follow the same
/// pattern as the rest of the crate's option structs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the local tree to mirror.
    pub source: PathBuf,
    /// Directory holding persisted snapshot state between runs.
    pub state_dir: PathBuf,
    /// Include patterns, passed through to matcher construction.
    pub includes: Vec<String>,
    /// Exclude patterns, passed through to matcher construction.
    pub excludes: Vec<String>,
    /// Count operations without issuing them or advancing state.
    pub dry_run: bool,
    /// Whether locally-removed paths are deleted remotely.
    pub delete_dest: bool,
    /// Re-sync every present path regardless of the previous snapshot.
    pub full_sync: bool,
    /// Hash file content into snapshot fingerprints.
    pub fingerprint: bool,
}

impl SyncConfig {
    /// Create a config with default flags for the given source and state dir.
    pub fn new(source: impl Into<PathBuf>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            state_dir: state_dir.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            dry_run: false,
            delete_dest: true,
            full_sync: false,
            fingerprint: false,
        }
    }

    /// Sets the include patterns
    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    /// Sets the exclude patterns
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Sets dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets whether removed paths are deleted remotely
    pub fn with_delete_dest(mut self, delete_dest: bool) -> Self {
        self.delete_dest = delete_dest;
        self
    }

    /// Sets full-sync mode
    pub fn with_full_sync(mut self, full_sync: bool) -> Self {
        self.full_sync = full_sync;
        self
    }

    /// Enables content fingerprinting
    pub fn with_fingerprint(mut self, fingerprint: bool) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Build the matcher from the configured patterns.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPattern` if any pattern fails to compile
    pub fn build_matcher(&self) -> Result<GlobMatcher, DomainError> {
        GlobMatcher::new(&self.includes, &self.excludes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.sync.source, PathBuf::from("."));
        assert!(cfg.sync.state_dir.to_string_lossy().contains("uptree"));
        assert!(cfg.sync.includes.is_empty());
        assert!(cfg.sync.excludes.is_empty());
        assert!(cfg.sync.delete_dest);
        assert!(!cfg.sync.fingerprint);
        assert_eq!(cfg.remote.name, "local");
        assert_eq!(cfg.logging.level, "info");
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
sync:
  source: /tmp/project
  state_dir: /tmp/state
  includes:
    - "*.rs"
  excludes:
    - "target*"
  delete_dest: false
  fingerprint: true
remote:
  name: backup
  target: /mnt/backup/project
logging:
  level: debug
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.sync.source, PathBuf::from("/tmp/project"));
        assert_eq!(cfg.sync.state_dir, PathBuf::from("/tmp/state"));
        assert_eq!(cfg.sync.includes, vec!["*.rs".to_string()]);
        assert_eq!(cfg.sync.excludes, vec!["target*".to_string()]);
        assert!(!cfg.sync.delete_dest);
        assert!(cfg.sync.fingerprint);
        assert_eq!(cfg.remote.name, "backup");
        assert_eq!(cfg.remote.target, PathBuf::from("/mnt/backup/project"));
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        let result = Config::load(tmp.path());
        assert!(result.is_err());
    }

    // -- Validation --

    #[test]
    fn validate_catches_missing_source() {
        let mut cfg = Config::default();
        cfg.sync.source = PathBuf::from("/definitely/not/here");
        cfg.remote.target = PathBuf::from("/tmp");
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sync.source"));
    }

    #[test]
    fn validate_catches_empty_remote_target() {
        let cfg = Config::default();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "remote.target"));
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validate_catches_bad_pattern() {
        let mut cfg = Config::default();
        cfg.sync.excludes = vec!["[".to_string()];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sync.includes/excludes"));
    }

    #[test]
    fn validate_accepts_all_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let mut cfg = Config::default();
            cfg.remote.target = PathBuf::from("/tmp");
            cfg.logging.level = level.to_string();
            let errors = cfg.validate();
            assert!(
                !errors.iter().any(|e| e.field == "logging.level"),
                "level '{level}' should be valid"
            );
        }
    }

    // -- SyncConfig --

    #[test]
    fn sync_config_defaults() {
        let cfg = SyncConfig::new("/src", "/state");
        assert_eq!(cfg.source, PathBuf::from("/src"));
        assert_eq!(cfg.state_dir, PathBuf::from("/state"));
        assert!(!cfg.dry_run);
        assert!(cfg.delete_dest);
        assert!(!cfg.full_sync);
        assert!(!cfg.fingerprint);
    }

    #[test]
    fn sync_config_with_setters() {
        let cfg = SyncConfig::new("/src", "/state")
            .with_includes(vec!["*.txt".into()])
            .with_excludes(vec!["tmp*".into()])
            .with_dry_run(true)
            .with_delete_dest(false)
            .with_full_sync(true)
            .with_fingerprint(true);

        assert_eq!(cfg.includes, vec!["*.txt".to_string()]);
        assert_eq!(cfg.excludes, vec!["tmp*".to_string()]);
        assert!(cfg.dry_run);
        assert!(!cfg.delete_dest);
        assert!(cfg.full_sync);
        assert!(cfg.fingerprint);
    }

    #[test]
    fn sync_config_build_matcher() {
        let cfg = SyncConfig::new("/src", "/state").with_excludes(vec!["*.log".into()]);
        let matcher = cfg.build_matcher().unwrap();
        use crate::ports::path_matcher::PathMatcher;
        assert!(matcher.matches("notes.txt"));
        assert!(!matcher.matches("debug.log"));
    }

    #[test]
    fn sync_config_build_matcher_invalid_pattern() {
        let cfg = SyncConfig::new("/src", "/state").with_includes(vec!["[".into()]);
        assert!(cfg.build_matcher().is_err());
    }

    // -- default_path --

    #[test]
    fn default_path_ends_with_config_yaml() {
        let p = Config::default_path();
        assert!(p.ends_with("uptree/config.yaml"));
    }

    // -- ValidationError Display --

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "remote.target".into(),
            message: "must not be empty".into(),
        };
        assert_eq!(err.to_string(), "remote.target: must not be empty");
    }
}
