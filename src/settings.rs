use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::embed::{Encoding, DEFAULT_ENDPOINT};
use crate::pipeline::Tool;

const CONFIG_FILE: &str = "lehrmittel.toml";
const ENV_PREFIX: &str = "LEHRMITTEL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Answer page every generated link points at.
    pub endpoint: String,
    /// Lehrmittel document read by `extract` and `rewrite`.
    pub source_file: String,
    /// Written by `extract`, read by `convert`.
    pub questions_file: String,
    /// Written by `convert`.
    pub converted_file: String,
    pub convert_encoding: Encoding,
    pub rewrite_encoding: Encoding,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            source_file: "2 Lehrmittel.md".to_string(),
            questions_file: "2 Lehrmittel Fragen.md".to_string(),
            converted_file: "2 Lehrmittel Fragen new.md".to_string(),
            convert_encoding: Encoding::Raw,
            rewrite_encoding: Encoding::Percent,
        }
    }
}

impl Settings {
    /// Encoding used when the command line does not pick one.
    pub fn encoding_for(&self, tool: Tool) -> Encoding {
        match tool {
            Tool::Rewrite => self.rewrite_encoding,
            Tool::Extract | Tool::Convert => self.convert_encoding,
        }
    }
}

/// Defaults, then `lehrmittel.toml` in the working directory, then
/// `LEHRMITTEL_*` environment variables.
pub fn load() -> Result<Settings> {
    load_from(Path::new(CONFIG_FILE))
}

pub fn load_from(path: &Path) -> Result<Settings> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    config
        .try_deserialize()
        .context("Invalid configuration")
}

// ── Tests ──
