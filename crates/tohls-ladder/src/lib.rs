//! # tohls-ladder
//!
//! Pure planning logic for building an HLS bitrate ladder.
//!
//! This crate provides:
//!
//! - **Format parsing** ([`FormatDescriptor`]) -- `SIZE:FRAMERATE:QUALITY`
//!   strings such as `1080p::` or `1280x720:30:0.09`.
//! - **Source metadata** ([`SourceMetadata`], [`SourceInspector`]) -- what the
//!   planner needs to know about an input file, and the capability that
//!   obtains it.
//! - **Planning** ([`plan_rendition`], [`plan_ladder`]) -- fills in omitted
//!   fields and derives the bit rate parameters.
//! - **Encoding seam** ([`RenditionEncoder`]) -- the capability that turns a
//!   [`ResolvedRendition`] into a rendition playlist.
//! - **Master playlist** ([`MasterPlaylist`]) -- the top-level `.m3u8`.
//!
//! Nothing here spawns processes; see `tohls-av` for the ffmpeg/ffprobe
//! backed implementations.

pub mod encoder;
pub mod format;
pub mod plan;
pub mod playlist;
pub mod source;

// ---- Re-exports for convenience ----

pub use encoder::RenditionEncoder;
pub use format::{FormatDescriptor, QualityLevel, DEFAULT_QUALITY_FACTOR};
pub use plan::{plan_ladder, plan_rendition, BitRates, ResolvedRendition};
pub use playlist::{master_playlist_name, MasterPlaylist, Stream};
pub use source::{SourceInspector, SourceMetadata};
