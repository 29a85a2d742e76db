//! FFmpeg-based [`RenditionEncoder`] implementation.
//!
//! Each rendition is a separate `ffmpeg -f hls` run producing
//! `v<W>x<H>.m3u8` plus `v<W>x<H>_NNN.ts` segments in the output directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tohls_core::config::EncodeConfig;
use tohls_ladder::{RenditionEncoder, ResolvedRendition};

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// An encoder backed by the `ffmpeg` CLI.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: PathBuf,
    output_dir: PathBuf,
    settings: EncodeConfig,
}

impl FfmpegEncoder {
    /// Create a new encoder writing into `output_dir`.
    pub fn new(ffmpeg_path: PathBuf, output_dir: PathBuf, settings: EncodeConfig) -> Self {
        Self {
            ffmpeg_path,
            output_dir,
            settings,
        }
    }

    /// Create an encoder from the registry's ffmpeg entry.
    pub fn from_registry(
        tools: &ToolRegistry,
        output_dir: PathBuf,
        settings: EncodeConfig,
    ) -> tohls_core::Result<Self> {
        Ok(Self::new(tools.require("ffmpeg")?.path.clone(), output_dir, settings))
    }

    /// Full ffmpeg argument list for one rendition.
    pub fn args(&self, source: &Path, rendition: &ResolvedRendition) -> Vec<String> {
        let s = &self.settings;
        let rates = &rendition.bit_rates;
        let segments = self.output_dir.join(rendition.segment_pattern());
        let playlist = self.output_dir.join(rendition.playlist_name());

        let mut args: Vec<String> = vec!["-y".into(), "-i".into()];
        args.push(source.to_string_lossy().into_owned());
        args.extend([
            "-filter:v".to_string(),
            format!(
                "scale=w={}:h={},fps={}",
                rendition.width, rendition.height, rendition.frame_rate
            ),
            "-c:a".into(),
            s.audio_codec.clone(),
            "-strict".into(),
            "-2".into(),
            "-ar".into(),
            s.audio_sample_rate.to_string(),
            "-c:v".into(),
            s.video_codec.clone(),
            "-crf".into(),
            s.crf.to_string(),
            "-profile:v".into(),
            s.profile.clone(),
            "-pix_fmt".into(),
            s.pix_fmt.clone(),
            "-f".into(),
            "hls".into(),
            "-hls_time".into(),
            s.segment_duration_secs.to_string(),
            "-hls_playlist_type".into(),
            "vod".into(),
            "-b:v".into(),
            rates.video_bit_rate.to_string(),
            "-maxrate".into(),
            rates.max_video_bit_rate.to_string(),
            "-bufsize:v".into(),
            rates.buffer_size.to_string(),
            "-b:a".into(),
            rates.audio_bit_rate.to_string(),
            "-hls_segment_filename".into(),
            segments.to_string_lossy().into_owned(),
            playlist.to_string_lossy().into_owned(),
        ]);
        args
    }
}

#[async_trait]
impl RenditionEncoder for FfmpegEncoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn encode(
        &self,
        source: &Path,
        rendition: &ResolvedRendition,
    ) -> tohls_core::Result<String> {
        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            tohls_core::Error::tool(
                "ffmpeg",
                format!(
                    "failed to create output dir {}: {e}",
                    self.output_dir.display()
                ),
            )
        })?;

        tracing::info!(
            "HLS encode: {} -> {} ({}x{})",
            source.display(),
            self.output_dir.join(rendition.playlist_name()).display(),
            rendition.width,
            rendition.height
        );

        let mut cmd = ToolCommand::new(self.ffmpeg_path.clone());
        cmd.timeout(Duration::from_secs(self.settings.timeout_secs));
        cmd.args(self.args(source, rendition));
        cmd.execute().await?;

        Ok(rendition.playlist_name())
    }
}
