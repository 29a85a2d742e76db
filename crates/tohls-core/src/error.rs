//! Unified error type for tohls.
//!
//! Library crates funnel their failures into [`Error`]; the binary layers
//! per-file and per-stage context on top with `anyhow`.

use std::path::PathBuf;

/// Unified error type covering all failure modes of the ladder pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A format descriptor did not match `SIZE:FRAMERATE:QUALITY`.
    #[error("malformed format: '{0}'")]
    MalformedFormat(String),

    /// Input data (source metadata, descriptor, config value) failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Source metadata could not be obtained or parsed.
    #[error("Probe error: {0}")]
    Probe(String),

    /// An external tool (ffmpeg, ffprobe) failed to run or exited non-zero.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// The master playlist could not be created or written.
    #[error("unable to write master playlist '{}': {source}", path.display())]
    Manifest {
        /// Destination of the playlist.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Convenience constructor for [`Error::MalformedFormat`].
    pub fn malformed_format(input: impl Into<String>) -> Self {
        Error::MalformedFormat(input.into())
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Convenience constructor for [`Error::Probe`].
    pub fn probe(message: impl Into<String>) -> Self {
        Error::Probe(message.into())
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Manifest`].
    pub fn manifest(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Manifest {
            path: path.into(),
            source,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_format_display() {
        let err = Error::malformed_format("1080:30");
        assert_eq!(err.to_string(), "malformed format: '1080:30'");
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "exited with status 1");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: exited with status 1");
    }

    #[test]
    fn probe_display() {
        let err = Error::probe("division by zero");
        assert_eq!(err.to_string(), "Probe error: division by zero");
    }

    #[test]
    fn manifest_display_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::manifest("/out/movie.mp4.master.m3u8", io);
        let msg = err.to_string();
        assert!(msg.contains("/out/movie.mp4.master.m3u8"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }
}
