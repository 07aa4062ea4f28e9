//! `agenrp config`: Configuration management commands.

use agenrp_config::AppConfig;

const REDACTED: &str = "[REDACTED]";

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some(REDACTED.into());
    }
    if config.backend.anon_key.is_some() {
        config.backend.anon_key = Some(REDACTED.into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

/// Cache the key in the config file. Environment overrides are not written back.
pub async fn set_key(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let key = key.trim();
    if key.is_empty() {
        return Err("API key must not be empty".into());
    }

    let path = AppConfig::config_path();
    let mut config = AppConfig::load_from(&path)?;
    config.api_key = Some(key.to_string());
    config.save_to(&path)?;

    println!("✅ API key saved to {}", path.display());
    Ok(())
}
