use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn recibo_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".recibo"))
}

pub fn ensure_recibo_home() -> Result<PathBuf> {
    let dir = recibo_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Default location of the category store document.
pub fn default_store_path() -> Result<PathBuf> {
    Ok(ensure_recibo_home()?.join("categories.json"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_recibo_home()?.join("config.toml"))
}
