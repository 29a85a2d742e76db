//! Per-file ladder pipeline: probe → plan → encode → master playlist.
//!
//! Input files are processed one after another and the first failure stops
//! the run. Renditions of one file are encoded in declaration order, with up
//! to `jobs` encodes in flight; the master playlist always lists them in the
//! order the formats were given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use tohls_ladder::{
    master_playlist_name, plan_ladder, FormatDescriptor, MasterPlaylist, RenditionEncoder,
    ResolvedRendition, SourceInspector, Stream,
};

/// Orchestrates inspection, planning, encoding and manifest assembly.
pub struct LadderPipeline {
    inspector: Box<dyn SourceInspector>,
    encoder: Box<dyn RenditionEncoder>,
    output_dir: PathBuf,
    jobs: usize,
}

impl LadderPipeline {
    /// Create a pipeline writing master playlists to the current directory
    /// and encoding one rendition at a time.
    pub fn new(inspector: Box<dyn SourceInspector>, encoder: Box<dyn RenditionEncoder>) -> Self {
        Self {
            inspector,
            encoder,
            output_dir: PathBuf::from("."),
            jobs: 1,
        }
    }

    /// Directory receiving the master playlists.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Maximum number of concurrent rendition encodes per file (at least 1).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Where the master playlist for `input` is written.
    pub fn master_path(&self, input: &Path) -> PathBuf {
        self.output_dir.join(master_playlist_name(input))
    }

    /// Probe `input` and resolve every format against it, without encoding.
    pub async fn plan_file(
        &self,
        formats: &[FormatDescriptor],
        input: &Path,
    ) -> Result<Vec<ResolvedRendition>> {
        plan_file(self.inspector.as_ref(), formats, input).await
    }

    /// Run the whole pipeline for one input file and return the master
    /// playlist path.
    ///
    /// Rendition files already produced stay on disk when a later rendition
    /// fails; the master playlist is only written when every rendition
    /// succeeded.
    pub async fn process_file(&self, formats: &[FormatDescriptor], input: &Path) -> Result<PathBuf> {
        tracing::info!("Processing file '{}'", input.display());

        let ladder = self.plan_file(formats, input).await?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("couldn't create output dir {}", self.output_dir.display()))?;

        let streams: Vec<Stream> = stream::iter(formats.iter().zip(&ladder))
            .map(|(format, rendition)| self.encode_rendition(input, format, rendition))
            .buffered(self.jobs)
            .try_collect()
            .await?;

        let master = self.master_path(input);
        tracing::info!("Joining {} renditions into '{}'", streams.len(), master.display());
        let playlist: MasterPlaylist = streams.into_iter().collect();
        playlist.write_to(&master).context("unable to join")?;

        tracing::info!("Done with '{}'", input.display());
        Ok(master)
    }

    async fn encode_rendition(
        &self,
        input: &Path,
        format: &FormatDescriptor,
        rendition: &ResolvedRendition,
    ) -> Result<Stream> {
        tracing::info!("Format '{format}' -> {rendition}");
        let file_name = self
            .encoder
            .encode(input, rendition)
            .await
            .with_context(|| {
                format!(
                    "unable to convert to {}x{} with {}",
                    rendition.width,
                    rendition.height,
                    self.encoder.name()
                )
            })?;
        Ok(Stream::from_rendition(rendition, file_name))
    }

    /// Process every input in order, stopping at the first failure.
    pub async fn run(&self, formats: &[FormatDescriptor], inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut masters = Vec::with_capacity(inputs.len());
        for input in inputs {
            let master = self
                .process_file(formats, input)
                .await
                .with_context(|| format!("Error while processing file '{}'", input.display()))?;
            masters.push(master);
        }
        Ok(masters)
    }
}

/// Probe `input` with `inspector` and resolve every format against it.
pub async fn plan_file(
    inspector: &dyn SourceInspector,
    formats: &[FormatDescriptor],
    input: &Path,
) -> Result<Vec<ResolvedRendition>> {
    let source = inspector
        .inspect(input)
        .await
        .context("couldn't probe file")?;
    tracing::info!(
        "Source {}x{} @ {:.3} fps (via {})",
        source.width,
        source.height,
        source.frame_rate,
        inspector.name()
    );

    plan_ladder(formats, &source).context("couldn't plan renditions")
}
