//! Configuration loading, validation, and management for Agen RP.
//!
//! Loads configuration from `~/.agenrp/config.toml` with environment
//! variable overrides, and resolves credentials in a fixed order:
//! explicit key, then cached key, then the build-time default.

use agenrp_core::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Build-time fallback key, for local testing only.
const BUILD_DEFAULT_API_KEY: Option<&str> = option_env!("AGENRP_DEFAULT_API_KEY");

/// The root configuration structure.
///
/// Maps directly to `~/.agenrp/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cached Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Override for the Gemini API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Document storage backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Grounding behaviour
    #[serde(default)]
    pub grounding: GroundingConfig,

    /// Key supplied through the environment for this process
    #[serde(skip)]
    env_api_key: Option<String>,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_true() -> bool {
    true
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_url", &self.api_url)
            .field("backend", &self.backend)
            .field("grounding", &self.grounding)
            .field("env_api_key", &redact(&self.env_api_key))
            .finish()
    }
}

/// Supabase connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Metadata table name
    #[serde(default = "default_table")]
    pub table: String,

    /// Folder inside the bucket that uploads go to
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_bucket() -> String {
    "rp_files".into()
}
fn default_table() -> String {
    "rp_documents".into()
}
fn default_folder() -> String {
    "rp_docs".into()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            bucket: default_bucket(),
            table: default_table(),
            folder: default_folder(),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &redact(&self.anon_key))
            .field("bucket", &self.bucket)
            .field("table", &self.table)
            .field("folder", &self.folder)
            .finish()
    }
}

/// Backend settings with every required value present.
#[derive(Clone)]
pub struct ResolvedBackend {
    pub url: String,
    pub anon_key: String,
    pub bucket: String,
    pub table: String,
    pub folder: String,
}

impl std::fmt::Debug for ResolvedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBackend")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .field("table", &self.table)
            .field("folder", &self.folder)
            .finish()
    }
}

impl BackendConfig {
    /// Whether both the URL and the key are present.
    pub fn is_configured(&self) -> bool {
        non_blank(&self.url).is_some() && non_blank(&self.anon_key).is_some()
    }

    /// Resolve into usable settings; explicit values win over cached ones.
    pub fn resolve(
        &self,
        explicit_url: Option<&str>,
        explicit_key: Option<&str>,
    ) -> Result<ResolvedBackend, Error> {
        let url = first_present(&[explicit_url, self.url.as_deref()]).ok_or_else(|| {
            Error::Config {
                message: "Supabase URL is not configured".into(),
            }
        })?;
        let anon_key =
            first_present(&[explicit_key, self.anon_key.as_deref()]).ok_or_else(|| {
                Error::Config {
                    message: "Supabase anon key is not configured".into(),
                }
            })?;

        Ok(ResolvedBackend {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            bucket: self.bucket.clone(),
            table: self.table.clone(),
            folder: self.folder.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingConfig {
    /// Replace the built-in grounding policy with this file's contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_file: Option<PathBuf>,

    /// Open each session with the welcome message
    #[serde(default = "default_true")]
    pub welcome: bool,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            policy_file: None,
            welcome: true,
        }
    }
}

impl GroundingConfig {
    /// Read the policy override, if one is configured.
    pub fn load_policy(&self) -> Result<Option<String>, ConfigError> {
        let Some(path) = &self.policy_file else {
            return Ok(None);
        };
        std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| ConfigError::ReadError {
                path: path.clone(),
                reason: e.to_string(),
            })
    }
}

/// API key candidates in resolution order.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Supplied for this call (flag or environment)
    pub explicit: Option<String>,
    /// Previously cached in the config file
    pub cached: Option<String>,
    /// Build-time default
    pub default: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("explicit", &redact(&self.explicit))
            .field("cached", &redact(&self.cached))
            .field("default", &redact(&self.default))
            .finish()
    }
}

impl Credentials {
    /// Pick the first usable key: explicit, then cached, then default.
    /// Blank values are skipped.
    pub fn resolve(&self) -> Result<String, Error> {
        first_present(&[
            self.explicit.as_deref(),
            self.cached.as_deref(),
            self.default.as_deref(),
        ])
        .ok_or(Error::MissingCredential)
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.agenrp/config.toml).
    ///
    /// Environment overrides:
    /// - `AGENRP_API_KEY`, then `GEMINI_API_KEY` (explicit key)
    /// - `AGENRP_MODEL`
    /// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `SUPABASE_BUCKET`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.env_api_key = lookup("AGENRP_API_KEY").or_else(|| lookup("GEMINI_API_KEY"));

        if let Some(model) = lookup("AGENRP_MODEL") {
            self.model = model;
        }
        if let Some(url) = lookup("SUPABASE_URL") {
            self.backend.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            self.backend.anon_key = Some(key);
        }
        if let Some(bucket) = lookup("SUPABASE_BUCKET") {
            self.backend.bucket = bucket;
        }
    }

    /// Write the configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agenrp")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Credentials for a model call; `explicit` (e.g. a CLI flag) beats the
    /// environment key.
    pub fn credentials(&self, explicit: Option<String>) -> Credentials {
        Credentials {
            explicit: explicit.or_else(|| self.env_api_key.clone()),
            cached: self.api_key.clone(),
            default: BUILD_DEFAULT_API_KEY.map(str::to_string),
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.backend.bucket.trim().is_empty() || self.backend.table.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "backend bucket and table must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            api_url: None,
            backend: BackendConfig::default(),
            grounding: GroundingConfig::default(),
            env_api_key: None,
        }
    }
}

/// First candidate that is present and not blank, trimmed.
fn first_present(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.backend.bucket, "rp_files");
        assert!(config.grounding.welcome);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig {
            api_key: Some("cached".into()),
            ..AppConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.api_key.as_deref(), Some("cached"));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = \"hot\"").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            api_key: Some("AIza-test".into()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("AIza-test"));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut config = AppConfig {
            api_key: Some("super-secret".into()),
            ..AppConfig::default()
        };
        config.backend.anon_key = Some("anon-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("anon-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_prefer_explicit() {
        let creds = Credentials {
            explicit: Some("explicit".into()),
            cached: Some("cached".into()),
            default: Some("default".into()),
        };
        assert_eq!(creds.resolve().unwrap(), "explicit");
    }

    #[test]
    fn credentials_skip_blank_values() {
        let creds = Credentials {
            explicit: Some("   ".into()),
            cached: None,
            default: Some("default".into()),
        };
        assert_eq!(creds.resolve().unwrap(), "default");
    }

    #[test]
    fn credentials_missing_everywhere() {
        let creds = Credentials::default();
        assert!(matches!(creds.resolve(), Err(Error::MissingCredential)));
    }

    #[test]
    fn env_key_counts_as_explicit() {
        let mut config = AppConfig {
            api_key: Some("cached".into()),
            ..AppConfig::default()
        };
        config.apply_env(env(&[("GEMINI_API_KEY", "from-env")]));
        assert_eq!(config.credentials(None).resolve().unwrap(), "from-env");
        assert_eq!(
            config.credentials(Some("flag".into())).resolve().unwrap(),
            "flag"
        );
    }

    #[test]
    fn env_overrides_model_and_backend() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("AGENRP_MODEL", "gemini-2.5-pro"),
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!(config.backend.is_configured());

        let backend = config.backend.resolve(None, None).unwrap();
        assert_eq!(backend.url, "https://abc.supabase.co");
        assert_eq!(backend.anon_key, "anon");
    }

    #[test]
    fn backend_requires_url_and_key() {
        let backend = BackendConfig::default();
        assert!(!backend.is_configured());
        assert!(matches!(
            backend.resolve(None, None),
            Err(Error::Config { .. })
        ));
        let resolved = backend
            .resolve(Some("https://x.supabase.co"), Some("k"))
            .unwrap();
        assert_eq!(resolved.bucket, "rp_files");
    }

    #[test]
    fn policy_override_is_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        std::fs::write(&path, "Jawab ringkas sahaja.").unwrap();
        let grounding = GroundingConfig {
            policy_file: Some(path),
            welcome: false,
        };
        assert_eq!(
            grounding.load_policy().unwrap().as_deref(),
            Some("Jawab ringkas sahaja.")
        );
        assert!(GroundingConfig::default().load_policy().unwrap().is_none());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini-2.5-flash"));
        assert!(toml_str.contains("rp_documents"));
    }
}
