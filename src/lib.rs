//! tohls: turn media files into HLS adaptive bitrate ladders.
//!
//! The binary wires [`tohls_av`]'s ffprobe/ffmpeg implementations into the
//! [`pipeline::LadderPipeline`]; the planning logic itself lives in
//! [`tohls_ladder`].

pub mod pipeline;

pub use pipeline::LadderPipeline;
