//! Generator configuration
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional `connector-gen.toml`, environment variables, and CLI flags (applied
//! by the CLI on top of [`GeneratorConfig::load`]).
//!
//! ```toml
//! output_dir = "connectors/generated"
//! catalogs = ["catalogs/discord.yaml"]
//! max_tier = 2
//! readme_template = "templates/README.md.j2"
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "connector-gen.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "connectors/generated";
pub const DEFAULT_MAX_TIER: u8 = 2;

pub const ENV_OUTPUT_DIR: &str = "CONNECTOR_GEN_OUTPUT_DIR";
pub const ENV_MAX_TIER: &str = "CONNECTOR_GEN_MAX_TIER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Root of the generated connector tree
    pub output_dir: PathBuf,
    /// Extra YAML/JSON catalogs registered after the built-in services
    pub catalogs: Vec<PathBuf>,
    /// Highest operation tier included in multi-operation connectors
    pub max_tier: u8,
    /// Custom minijinja README template
    pub readme_template: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            catalogs: Vec::new(),
            max_tier: DEFAULT_MAX_TIER,
            readme_template: None,
        }
    }
}

/// On-disk shape of `connector-gen.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub catalogs: Vec<PathBuf>,
    pub max_tier: Option<u8>,
    pub readme_template: Option<PathBuf>,
}

/// Parse a config file
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but fails
/// to parse.
pub fn load_config_file(path: &Path) -> anyhow::Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(file))
}

/// Validate a tier threshold
pub fn parse_tier(value: &str) -> anyhow::Result<u8> {
    let tier: u8 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a tier"))?;
    check_tier(tier)
}

fn check_tier(tier: u8) -> anyhow::Result<u8> {
    if (1..=3).contains(&tier) {
        Ok(tier)
    } else {
        anyhow::bail!("max tier must be between 1 and 3, got {tier}")
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

impl GeneratorConfig {
    /// Overlay a parsed config file whose directory is `base`
    pub fn apply_file(&mut self, file: ConfigFile, base: &Path) -> anyhow::Result<()> {
        if let Some(dir) = file.output_dir {
            self.output_dir = resolve(base, dir);
        }
        self.catalogs
            .extend(file.catalogs.into_iter().map(|c| resolve(base, c)));
        if let Some(tier) = file.max_tier {
            self.max_tier = check_tier(tier)?;
        }
        if let Some(template) = file.readme_template {
            self.readme_template = Some(resolve(base, template));
        }
        Ok(())
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|d| !d.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(tier) = lookup(ENV_MAX_TIER).filter(|t| !t.is_empty()) {
            self.max_tier = parse_tier(&tier).with_context(|| format!("Invalid {ENV_MAX_TIER}"))?;
        }
        Ok(())
    }

    /// Defaults, then the config file, then the process environment
    ///
    /// `explicit` must exist; without it `connector-gen.toml` in the working
    /// directory is used when present.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = GeneratorConfig::default();
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        if let Some(file) = load_config_file(&path)? {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.apply_file(file, base)?;
            tracing::debug!(config = %path.display(), "Loaded config file");
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }
}
