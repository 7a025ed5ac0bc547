//! Toolbelt configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tools::{ToolContext, ToolRegistry};

/// Main toolbelt configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sandbox and working directory
    pub sandbox: SandboxConfig,

    /// Search worker pool
    pub search: SearchConfig,

    /// Which tools the session exposes
    pub tools: ToolsConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .toolbelt.yml
        let local_config = PathBuf::from(".toolbelt.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/toolbelt/toolbelt.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("toolbelt").join("toolbelt.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Build the per-session tool context
    ///
    /// Relative directories are taken relative to the process working
    /// directory. The working dir defaults to the sandbox root when one is
    /// set, else to the process working directory.
    pub fn tool_context(&self) -> Result<ToolContext> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let root = self.sandbox.root.as_ref().map(|r| cwd.join(r));
        let working_dir = match (&self.sandbox.working_dir, &root) {
            (Some(dir), _) => cwd.join(dir),
            (None, Some(root)) => root.clone(),
            (None, None) => cwd,
        };

        let mut ctx = match root {
            Some(root) => ToolContext::new(root),
            None => ToolContext::new_unsandboxed(working_dir.clone()),
        };
        ctx.working_dir = working_dir;

        if let Some(max) = self.search.max_workers {
            ctx = ctx.with_max_search_workers(max);
        }

        tracing::debug!(?ctx.working_dir, ?ctx.sandbox_root, "Config::tool_context: built");
        Ok(ctx)
    }

    /// Build the registry of enabled tools
    pub fn registry(&self) -> ToolRegistry {
        let registry = if self.tools.detect_runtimes {
            ToolRegistry::standard_with_runtime_probe()
        } else {
            ToolRegistry::standard()
        };
        registry.select(&self.tools.enabled)
    }
}

/// Sandbox configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Confine filesystem tools to this directory; unset = unrestricted
    pub root: Option<PathBuf>,

    /// Directory relative paths resolve against and commands run in
    #[serde(rename = "working-dir")]
    pub working_dir: Option<PathBuf>,
}

/// Search configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on search workers (never above available parallelism)
    #[serde(rename = "max-workers")]
    pub max_workers: Option<usize>,
}

/// Tool selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tool names to expose; empty = all
    pub enabled: Vec<String>,

    /// Probe the host for scripting runtimes and list them in RunInTerminal's description
    #[serde(rename = "detect-runtimes")]
    pub detect_runtimes: bool,
}
