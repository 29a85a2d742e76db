//! FFprobe-based [`SourceInspector`] implementation.
//!
//! Shells out to
//! `ffprobe -v error -select_streams v:0 -show_entries stream=width,height,r_frame_rate -of csv=s=,:p=0`
//! and parses the single `width,height,N/D` line it prints.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tohls_ladder::{SourceInspector, SourceMetadata};

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Default probe timeout: 1 minute.
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// An inspector backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeInspector {
    /// Path to the ffprobe binary.
    ffprobe_path: PathBuf,
    timeout: Duration,
}

impl FfprobeInspector {
    /// Create a new inspector using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self {
            ffprobe_path,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Create an inspector from the registry's ffprobe entry.
    pub fn from_registry(tools: &ToolRegistry) -> tohls_core::Result<Self> {
        Ok(Self::new(tools.require("ffprobe")?.path.clone()))
    }

    /// Override the probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, path: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffprobe_path.clone());
        cmd.timeout(self.timeout);
        cmd.args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=width,height,r_frame_rate",
            "-of", "csv=s=,:p=0",
        ]);
        cmd.arg(path.to_string_lossy().as_ref());
        cmd
    }
}

#[async_trait]
impl SourceInspector for FfprobeInspector {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    async fn inspect(&self, path: &Path) -> tohls_core::Result<SourceMetadata> {
        let output = self.command(path).execute().await.map_err(|e| {
            tohls_core::Error::probe(format!("couldn't probe {}: {e}", path.display()))
        })?;

        let meta = SourceMetadata::parse_probe_output(&output.stdout)?;
        tracing::debug!(
            "Probed {}: {}x{} @ {:.3} fps",
            path.display(),
            meta.width,
            meta.height,
            meta.frame_rate
        );
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn command_selects_first_video_stream() {
        let inspector = FfprobeInspector::new(PathBuf::from("/usr/bin/ffprobe"));
        let cmd = inspector.command(Path::new("/media/drone.mp4"));
        let args = cmd.get_args();
        assert_eq!(args.last().map(String::as_str), Some("/media/drone.mp4"));
        assert!(args.windows(2).any(|w| w == ["-select_streams", "v:0"]));
        assert!(args
            .windows(2)
            .any(|w| w == ["-show_entries", "stream=width,height,r_frame_rate"]));
        assert!(args.windows(2).any(|w| w == ["-of", "csv=s=,:p=0"]));
    }

    #[tokio::test]
    async fn missing_binary_is_probe_error() {
        let inspector = FfprobeInspector::new(PathBuf::from("nonexistent_ffprobe_xyz_12345"));
        let err = inspector.inspect(Path::new("input.mp4")).await.unwrap_err();
        assert_matches!(err, tohls_core::Error::Probe(msg) if msg.contains("input.mp4"));
    }

    #[test]
    fn from_registry_requires_ffprobe() {
        let registry = ToolRegistry::default();
        assert!(FfprobeInspector::from_registry(&registry).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn parses_stdout_of_tool() {
        // `echo` ignores the ffprobe flags and prints them back; the result is
        // not three fields, which must surface as a probe error, not a panic.
        let inspector = FfprobeInspector::new(PathBuf::from("echo"));
        let result = inspector.inspect(Path::new("input.mp4")).await;
        assert_matches!(result, Err(tohls_core::Error::Probe(_)));
    }
}
