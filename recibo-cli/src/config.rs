use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::home::config_path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub scan: ScanSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreSection {
    /// Category store file; defaults to ~/.recibo/categories.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSection {
    /// Line that opens the product section of a receipt
    #[serde(default = "default_section_marker")]
    pub section_marker: String,
    /// Line that ends the scan
    #[serde(default = "default_terminator")]
    pub terminator: String,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            section_marker: default_section_marker(),
            terminator: default_terminator(),
        }
    }
}

fn default_section_marker() -> String {
    recibo_ingest::SECTION_MARKER.to_string()
}

fn default_terminator() -> String {
    recibo_ingest::TERMINATOR.to_string()
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
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
