//! # tohls-av
//!
//! External tool plumbing for tohls.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe, honoring configured overrides.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Inspection** ([`FfprobeInspector`]) -- implements
//!   [`tohls_ladder::SourceInspector`] by shelling out to ffprobe.
//! - **Encoding** ([`FfmpegEncoder`]) -- implements
//!   [`tohls_ladder::RenditionEncoder`] by running one ffmpeg HLS encode per
//!   rendition.

pub mod command;
pub mod encode;
pub mod probe;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use encode::FfmpegEncoder;
pub use probe::FfprobeInspector;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
