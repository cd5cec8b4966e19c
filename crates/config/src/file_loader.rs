use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration loaded from `cosmic-config.toml` (or `cosmic.config.toml`) at repo root.
/// All fields are optional; if present they populate environment variables
/// that are not already set, so the environment always wins.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub api: ApiSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppSection {
    pub image_dir: Option<String>,
    pub public_dir: Option<String>,
    pub storage_type: Option<String>,
    pub search_debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    pub addr: Option<String>,
}

const CANDIDATES: &[&str] = &[
    "cosmic-config.toml",
    "cosmic.config.toml",
    "config/cosmic-config.toml",
];

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment variable assignments carried by this file.
    pub fn env_pairs(self) -> Vec<(&'static str, String)> {
        let pairs = [
            ("COSMIC_IMAGE_DIR", self.app.image_dir),
            ("COSMIC_PUBLIC_DIR", self.app.public_dir),
            ("COSMIC_STORAGE_TYPE", self.app.storage_type),
            (
                "COSMIC_SEARCH_DEBOUNCE_MS",
                self.app.search_debounce_ms.map(|v| v.to_string()),
            ),
            ("COSMIC_API_ADDR", self.api.addr),
        ];

        pairs
            .into_iter()
            .filter_map(|(key, val)| {
                let val = val?;
                let trimmed = val.trim();
                (!trimmed.is_empty()).then(|| (key, trimmed.to_string()))
            })
            .collect()
    }
}

pub fn load_file_config_into_env() -> Result<()> {
    if let Some(cfg) = read_first_config()? {
        for (key, val) in cfg.env_pairs() {
            if env::var(key).is_err() {
                env::set_var(key, val);
            }
        }
    }
    Ok(())
}

fn read_first_config() -> Result<Option<FileConfig>> {
    for candidate in CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let cfg = FileConfig::parse(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}
