//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of ffmpeg and
//! ffprobe and provides lookup methods for the rest of the crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tohls_core::config::ToolsConfig;

/// Known tool names that the registry manages.
pub const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// A discovered external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool configurations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// For each known tool, if the [`ToolsConfig`] supplies a custom path
    /// **and** that path exists, it is used directly. Otherwise
    /// [`which::which`] is used to locate the tool in `PATH`. Tools that are
    /// not found are omitted from the registry.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut registry = Self::default();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                "ffprobe" => tools_config.ffprobe_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "Configured {name} path {} does not exist; searching PATH",
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            match resolved {
                Some(path) => {
                    tracing::debug!("Found {name} at {}", path.display());
                    registry.insert(name, path);
                }
                None => tracing::debug!("{name} not found"),
            }
        }

        registry
    }

    /// Register (or replace) a tool path explicitly.
    pub fn insert(&mut self, name: &str, path: PathBuf) {
        self.tools.insert(
            name.to_string(),
            ToolConfig {
                name: name.to_string(),
                path,
            },
        );
    }

    /// Return a reference to the [`ToolConfig`] for the given tool, or an
    /// [`tohls_core::Error::Tool`] if the tool was not found during discovery.
    pub fn require(&self, name: &str) -> tohls_core::Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            tohls_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(&cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
