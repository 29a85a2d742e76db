//! HLS master playlist assembly.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tohls_core::{Error, Result};

use crate::plan::ResolvedRendition;

/// One successfully produced rendition, as referenced by the master playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub width: u32,
    pub height: u32,
    /// Declared bandwidth in bits per second.
    pub bandwidth: u64,
    /// Rendition playlist reference, relative to the master playlist.
    pub file_name: String,
}

impl Stream {
    /// Stream entry for an encoded rendition; bandwidth is its video bit rate.
    pub fn from_rendition(rendition: &ResolvedRendition, file_name: impl Into<String>) -> Self {
        Self {
            width: rendition.width,
            height: rendition.height,
            bandwidth: rendition.bit_rates.video_bit_rate,
            file_name: file_name.into(),
        }
    }
}

/// Master playlist. Streams keep insertion order; they are never sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterPlaylist {
    streams: Vec<Stream>,
}

impl MasterPlaylist {
    /// Create an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stream.
    pub fn push(&mut self, stream: Stream) {
        self.streams.push(stream);
    }

    /// Streams in insertion order.
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Render to M3U8 text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the rendered playlist to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] if the file cannot be created or fully
    /// written. The handle is closed on every path.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|e| Error::manifest(path, e))?;
        file.write_all(self.render().as_bytes())
            .map_err(|e| Error::manifest(path, e))?;
        tracing::debug!(
            "Wrote master playlist {} ({} streams)",
            path.display(),
            self.streams.len()
        );
        Ok(())
    }
}

impl FromIterator<Stream> for MasterPlaylist {
    fn from_iter<I: IntoIterator<Item = Stream>>(iter: I) -> Self {
        Self {
            streams: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for MasterPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#EXTM3U")?;
        for stream in &self.streams {
            writeln!(
                f,
                "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}x{}",
                stream.bandwidth, stream.width, stream.height
            )?;
            writeln!(f, "{}", stream.file_name)?;
        }
        Ok(())
    }
}

/// Master playlist file name for an input: `<file name>.master.m3u8`.
///
/// The input's final path component is kept whole, extension included.
pub fn master_playlist_name(input: &Path) -> String {
    let base = input
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| input.to_string_lossy());
    format!("{base}.master.m3u8")
}
