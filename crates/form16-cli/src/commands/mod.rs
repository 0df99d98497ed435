//! Subcommands and the helpers they share.

pub mod batch;
pub mod compute;
pub mod config;
pub mod process;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tracing::debug;

use form16_core::{DocumentLayout, Form16Config, FormData};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("form16")
        .join("config.json")
}

/// Load the configuration from `--config`, else the default location if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<Form16Config> {
    if let Some(path) = config_path {
        return Ok(Form16Config::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(Form16Config::from_file(&default_path)?)
    } else {
        Ok(Form16Config::default())
    }
}

/// Sampling source: `--seed`, then the configured seed, then entropy.
pub fn suggestion_rng(seed: Option<u64>, config: &Form16Config) -> StdRng {
    match seed.or(config.suggestions.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Document layout selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LayoutArg {
    /// Statement of taxable income (old tax slab)
    Old,
    /// Form 16 as per new regime
    New,
}

impl From<LayoutArg> for DocumentLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Old => DocumentLayout::Old,
            LayoutArg::New => DocumentLayout::New,
        }
    }
}

/// Parse `KEY=VALUE` pairs into a field map. Values stay strings; the core
/// cleans them.
pub fn parse_assignments(pairs: &[String]) -> anyhow::Result<FormData> {
    let mut fields = FormData::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            anyhow::bail!("Expected KEY=VALUE, got: {}", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Empty key in: {}", pair);
        }
        fields.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(fields)
}

/// Read a JSON object of fields, given inline or as a file path.
pub fn read_fields_json(source: &str) -> anyhow::Result<FormData> {
    let content = if source.trim_start().starts_with('{') {
        source.to_string()
    } else {
        fs::read_to_string(source)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", source, e))?
    };

    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => anyhow::bail!("Deduction input must be a JSON object"),
    }
}

/// Deduction inputs from `--deductions` and `--deduction`, the latter
/// taking precedence.
pub fn collect_deductions(json: Option<&str>, pairs: &[String]) -> anyhow::Result<FormData> {
    let mut inputs = match json {
        Some(source) => read_fields_json(source)?,
        None => FormData::new(),
    };
    inputs.extend(parse_assignments(pairs)?);
    Ok(inputs)
}
