use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use mentor_core::EngineConfig;

use crate::state::ensure_mentor_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User key for plan storage when no --user flag is given.
    pub user: String,
    /// Campus timezone, used to date portal timestamps.
    pub timezone: String,
    pub model: ModelSection,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// "anthropic", "openai", or "none".
    pub provider: String,
    pub model: String,
    /// Empty string means the provider's default endpoint.
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: "local".to_string(),
            timezone: "America/Chicago".to_string(),
            model: ModelSection::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            // "none" keeps every flow on the deterministic paths until a
            // provider is configured.
            provider: "none".to_string(),
            model: "claude-3-5-sonnet-latest".to_string(),
            base_url: String::new(),
            max_tokens: 700,
            temperature: 0.4,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mentor_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes_to_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert!(s.contains("provider = \"none\""));
        assert!(s.contains("[engine.allocator]"));

        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.user, "local");
        assert_eq!(back.engine.allocator.daily_cap_hours, 4.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let s = "user = \"amy\"\n\n[model]\nprovider = \"anthropic\"\n";
        let cfg: Config = toml::from_str(s).unwrap();
        assert_eq!(cfg.user, "amy");
        assert_eq!(cfg.model.provider, "anthropic");
        assert_eq!(cfg.model.max_tokens, 700);
        assert_eq!(cfg.timezone, "America/Chicago");
    }
}
