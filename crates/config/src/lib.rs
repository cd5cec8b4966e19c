//! Application-wide configuration helpers.
//!
//! Reads environment variables (with optional `.env` and `cosmic-config.toml`)
//! and provides strongly typed config structs consumed by other crates.

mod file_loader;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub use file_loader::{load_file_config_into_env, FileConfig};

pub const DEFAULT_IMAGE_DIR: &str = "public/images";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_API_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Which backend answers "list captures".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageKind {
    #[default]
    Local,
    External,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "external" => Ok(Self::External),
            other => Err(anyhow::anyhow!("Unknown storage type: {other}")),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::External => f.write_str("external"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of the `<date>/<captureName>/` tree.
    pub image_dir: PathBuf,
    /// Static assets served as the router fallback.
    pub public_dir: PathBuf,
    pub storage_type: StorageKind,
    pub api_addr: String,
    /// Delay applied to search input before the gallery re-filters.
    pub search_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        load_file_config_into_env()?;
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let image_dir = lookup("COSMIC_IMAGE_DIR")
            .unwrap_or_else(|| DEFAULT_IMAGE_DIR.to_string())
            .into();
        let public_dir = lookup("COSMIC_PUBLIC_DIR")
            .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string())
            .into();
        let storage_type = match lookup("COSMIC_STORAGE_TYPE") {
            Some(val) => val.parse::<StorageKind>()?,
            None => StorageKind::default(),
        };
        let api_addr = match (lookup("COSMIC_API_ADDR"), lookup("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => {
                let port = port
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("Failed to parse PORT as u16: {port}"))?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => DEFAULT_API_ADDR.to_string(),
        };
        let search_debounce_ms = read_u64(
            &lookup,
            "COSMIC_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?;

        Ok(Self {
            image_dir,
            public_dir,
            storage_type,
            api_addr,
            search_debounce_ms,
        })
    }
}

fn read_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Failed to parse {key} as u64")),
        None => Ok(default),
    }
}
