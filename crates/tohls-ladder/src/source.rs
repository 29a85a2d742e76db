//! Source metadata and the [`SourceInspector`] capability.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tohls_core::{Error, Result};

/// Native properties of the primary video stream of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    /// Frames per second, already reduced from the probe's `N/D` ratio.
    pub frame_rate: f64,
}

impl SourceMetadata {
    /// Build metadata from a frame-rate ratio.
    ///
    /// A zero denominator is a probe error rather than an infinite rate.
    pub fn from_ratio(width: u32, height: u32, numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 {
            return Err(Error::probe(format!(
                "unable to calculate frame rate from {numerator}/{denominator}: division by zero"
            )));
        }
        Ok(Self {
            width,
            height,
            frame_rate: numerator as f64 / denominator as f64,
        })
    }

    /// Parse a `width,height,N/D` probe response (surrounding whitespace is
    /// ignored).
    pub fn parse_probe_output(output: &str) -> Result<Self> {
        let output = output.trim();
        let parts: Vec<&str> = output.split(',').collect();
        let [w, h, ratio] = parts.as_slice() else {
            return Err(Error::probe(format!(
                "couldn't parse output: expected 3 parts but found {}",
                parts.len()
            )));
        };

        let (num, den) = ratio
            .split_once('/')
            .ok_or_else(|| Error::probe(format!("unexpected frame rate '{ratio}': missing '/'")))?;

        let unparsable = || Error::probe(format!("unable to parse probe result '{output}'"));
        let width = w.trim().parse::<u32>().map_err(|_| unparsable())?;
        let height = h.trim().parse::<u32>().map_err(|_| unparsable())?;
        let num = num.trim().parse::<u64>().map_err(|_| unparsable())?;
        let den = den.trim().parse::<u64>().map_err(|_| unparsable())?;

        Self::from_ratio(width, height, num, den)
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Obtains [`SourceMetadata`] for an input file.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
#[async_trait]
pub trait SourceInspector: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Inspect the file at `path`.
    async fn inspect(&self, path: &Path) -> Result<SourceMetadata>;
}
