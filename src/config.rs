use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::strategy::StrategyKind;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub scan: Option<ScanConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_min_description_chars")]
    pub min_description_chars: usize,
    #[serde(default = "default_high_confidence_threshold")]
    pub high_confidence_threshold: f64,
    #[serde(default = "default_max_section_items")]
    pub max_section_items: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            min_description_chars: default_min_description_chars(),
            high_confidence_threshold: default_high_confidence_threshold(),
            max_section_items: default_max_section_items(),
        }
    }
}

fn default_min_description_chars() -> usize {
    20
}
fn default_high_confidence_threshold() -> f64 {
    0.7
}
fn default_max_section_items() -> usize {
    10
}

/// Bounds applied while unpacking OOXML containers.
#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_max_xml_entry_bytes")]
    pub max_xml_entry_bytes: u64,
    #[serde(default = "default_xlsx_max_sheets")]
    pub xlsx_max_sheets: usize,
    #[serde(default = "default_xlsx_max_cells_per_sheet")]
    pub xlsx_max_cells_per_sheet: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_xml_entry_bytes: default_max_xml_entry_bytes(),
            xlsx_max_sheets: default_xlsx_max_sheets(),
            xlsx_max_cells_per_sheet: default_xlsx_max_cells_per_sheet(),
        }
    }
}

fn default_max_xml_entry_bytes() -> u64 {
    50 * 1024 * 1024
}
fn default_xlsx_max_sheets() -> usize {
    100
}
fn default_xlsx_max_cells_per_sheet() -> usize {
    100_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl ScanConfig {
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_include_globs() -> Vec<String> {
    ["xlsx", "xls", "docx", "doc", "pptx", "ppt"]
        .iter()
        .map(|ext| format!("**/*.{}", ext))
        .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Loads `path` when it exists; a missing file yields the built-in defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if !(0.0..=2.0).contains(&config.extraction.high_confidence_threshold) {
        anyhow::bail!("extraction.high_confidence_threshold must be in [0.0, 2.0]");
    }

    if config.extraction.max_section_items == 0 {
        anyhow::bail!("extraction.max_section_items must be > 0");
    }

    if config.limits.max_xml_entry_bytes == 0 {
        anyhow::bail!("limits.max_xml_entry_bytes must be > 0");
    }

    if config.limits.xlsx_max_sheets == 0 || config.limits.xlsx_max_cells_per_sheet == 0 {
        anyhow::bail!("limits.xlsx_max_sheets and limits.xlsx_max_cells_per_sheet must be > 0");
    }

    if let Some(scan) = &config.scan {
        if scan.include_globs.is_empty() {
            anyhow::bail!("scan.include_globs must not be empty");
        }
    }

    Ok(())
}
