//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treekit/treekit.toml`
//! 3. Local config: explicit file passed to `Settings::load`
//! 4. Environment variables: `TREEKIT__*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::TreeBuilder;

/// Limits applied when building trees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BuilderSettings {
    /// Reject inputs describing more nodes than this (no limit when unset)
    pub max_nodes: Option<usize>,
}

/// Terminal rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Placeholder printed for the absent sibling of a lone child
    pub missing_child: String,
    /// Label printed for a tree without nodes
    pub empty_tree: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            missing_child: "·".into(),
            empty_tree: "(empty)".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub builder: RawBuilderSettings,
    pub render: RawRenderSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawBuilderSettings {
    pub max_nodes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub missing_child: Option<String>,
    pub empty_tree: Option<String>,
}

/// Unified configuration for treekit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub builder: BuilderSettings,
    pub render: RenderSettings,
}

/// Get the XDG config directory for treekit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treekit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treekit.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path; unexpandable input is kept as is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            builder: BuilderSettings {
                max_nodes: overlay.builder.max_nodes.or(self.builder.max_nodes),
            },
            render: RenderSettings {
                missing_child: overlay
                    .render
                    .missing_child
                    .clone()
                    .unwrap_or_else(|| self.render.missing_child.clone()),
                empty_tree: overlay
                    .render
                    .empty_tree
                    .clone()
                    .unwrap_or_else(|| self.render.empty_tree.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_file` - Optional config file; `~` and `$VAR` are expanded.
    ///   A missing local file is an error, a missing global file is not.
    #[instrument(level = "debug")]
    pub fn load(local_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "applying global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local) = local_file {
            let local = expand_path(local);
            debug!(path = %local.display(), "applying local config");
            current = current.merge_with(&load_raw_settings(&local)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TREEKIT__* environment variables as explicit overrides,
    /// e.g. `TREEKIT__BUILDER__MAX_NODES=1000`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEKIT").prefix_separator("__").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("builder.max_nodes") {
            let max = val.parse::<usize>().map_err(|e| ApplicationError::Config {
                message: format!("builder.max_nodes = {:?}: {}", val, e),
            })?;
            settings.builder.max_nodes = Some(max);
        }
        if let Ok(val) = config.get_string("render.missing_child") {
            settings.render.missing_child = val;
        }
        if let Ok(val) = config.get_string("render.empty_tree") {
            settings.render.empty_tree = val;
        }

        Ok(settings)
    }

    /// A tree builder honouring the configured limits.
    pub fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::with_max_nodes(self.builder.max_nodes)
    }
}
