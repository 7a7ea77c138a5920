//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/phylotree/phylotree.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `PHYLOTREE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, IoResultExt};
use crate::domain::DeletePolicy;

/// How trees are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStyle {
    /// One name per line, indented by depth
    #[default]
    Indent,
    /// Box-drawing tree
    Tree,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::Indent => f.write_str("indent"),
            RenderStyle::Tree => f.write_str("tree"),
        }
    }
}

impl FromStr for RenderStyle {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indent" => Ok(RenderStyle::Indent),
            "tree" => Ok(RenderStyle::Tree),
            other => Err(ApplicationError::Config {
                message: format!("unknown render style '{other}' (expected indent or tree)"),
            }),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub indent_width: Option<usize>,
    pub render_style: Option<RenderStyle>,
    pub lineage_separator: Option<String>,
    pub delete_policy: Option<DeletePolicy>,
    pub edit_mode: Option<bool>,
}

/// Unified configuration for phylotree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Spaces per depth level in the outline (default: 1)
    pub indent_width: usize,
    /// Outline or box-drawing output
    pub render_style: RenderStyle,
    /// Joins lineage names (default: " > ")
    pub lineage_separator: String,
    /// Policy used when delete is called without one
    pub delete_policy: DeletePolicy,
    /// Start sessions with edit mode enabled
    pub edit_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_width: 1,
            render_style: RenderStyle::default(),
            lineage_separator: " > ".to_string(),
            delete_policy: DeletePolicy::default(),
            edit_mode: false,
        }
    }
}

/// Get the XDG config directory for phylotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "phylotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("phylotree.toml"))
}

/// Expand `~` and `$VAR` in a user supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            render_style: overlay.render_style.unwrap_or(self.render_style),
            lineage_separator: overlay
                .lineage_separator
                .clone()
                .unwrap_or_else(|| self.lineage_separator.clone()),
            delete_policy: overlay.delete_policy.unwrap_or(self.delete_policy),
            edit_mode: overlay.edit_mode.unwrap_or(self.edit_mode),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(file) = config_file {
            let path = expand_path(file);
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(&path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply PHYLOTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PHYLOTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("indent_width") {
            settings.indent_width = val.trim().parse().map_err(|_| ApplicationError::Config {
                message: format!("PHYLOTREE_INDENT_WIDTH is not a number: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("render_style") {
            settings.render_style = val.parse()?;
        }
        if let Ok(val) = config.get_string("lineage_separator") {
            settings.lineage_separator = val;
        }
        if let Ok(val) = config.get_string("delete_policy") {
            settings.delete_policy = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("PHYLOTREE_DELETE_POLICY: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("edit_mode") {
            settings.edit_mode = parse_flag(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("PHYLOTREE_EDIT_MODE is not a boolean: {val}"),
            })?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.indent_width == 0 {
            return Err(ApplicationError::Config {
                message: "indent_width must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# phylotree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/phylotree/phylotree.toml
#   File:   --config <file>
#   Env:    PHYLOTREE_* environment variables

# Spaces per tree level in the outline
# indent_width = 1

# "indent" (outline) or "tree" (box drawing)
# render_style = "indent"

# Joins names in a lineage
# lineage_separator = " > "

# promote | cascade | reject-non-leaf
# delete_policy = "promote"

# Start with edit mode enabled
# edit_mode = false
"#
        .to_string()
    }
}

/// Accepts the usual env spellings of a boolean.
fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
