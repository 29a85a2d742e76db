//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! tool overrides and encoder settings. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub encode: EncodeConfig,
    /// Maximum number of renditions of one file encoded at the same time.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Directory receiving playlists and segments. `None` means the
    /// current working directory.
    pub output_dir: Option<PathBuf>,
}

fn default_jobs() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            encode: EncodeConfig::default(),
            jobs: default_jobs(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| Error::Config(format!("parse error: {e}")))
    }

    /// Load configuration from an explicit path, or use defaults when no path
    /// is given.
    ///
    /// An explicit file that cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_json(&contents)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.jobs == 0 {
            warnings.push("jobs is 0; renditions will be encoded one at a time".into());
        }

        if self.encode.crf > 51 {
            warnings.push(format!(
                "encode.crf {} is outside the usual 0-51 range",
                self.encode.crf
            ));
        }

        if self.encode.segment_duration_secs == 0 {
            warnings.push("encode.segment_duration_secs is 0; ffmpeg will pick its own".into());
        }

        for (name, path) in [
            ("ffmpeg_path", &self.tools.ffmpeg_path),
            ("ffprobe_path", &self.tools.ffprobe_path),
        ] {
            if let Some(p) = path {
                if !p.exists() {
                    warnings.push(format!(
                        "tools.{name} {} does not exist; falling back to PATH",
                        p.display()
                    ));
                }
            }
        }

        warnings
    }

    /// Effective concurrency: never below one.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.max(1)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

/// Fixed encoder parameters shared by every rendition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub video_codec: String,
    pub crf: u32,
    pub profile: String,
    pub pix_fmt: String,
    pub audio_codec: String,
    pub audio_sample_rate: u32,
    /// Target HLS segment length.
    pub segment_duration_secs: u32,
    /// Upper bound for a single rendition encode.
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".into(),
            crf: 20,
            profile: "main".into(),
            pix_fmt: "yuv420p".into(),
            audio_codec: "aac".into(),
            audio_sample_rate: 48000,
            segment_duration_secs: 10,
            timeout_secs: 7200,
            probe_timeout_secs: 60,
        }
    }
}
