//! Rendition planning: resolve a [`FormatDescriptor`] against the source and
//! derive the bit rate parameters handed to the encoder.

use std::fmt;

use serde::{Deserialize, Serialize};
use tohls_core::{Error, Result};

use crate::format::{FormatDescriptor, DEFAULT_QUALITY_FACTOR};
use crate::source::SourceMetadata;

/// Peak-rate multiplier applied to the video bit rate.
///
/// This is 0.07, not 1.07: the peak rate sits well below the average rate.
/// Changing it changes every produced ladder.
pub const MAX_RATE_FACTOR: f64 = 0.07;

/// Bit rate parameters of one rendition, all in bits per second except
/// `buffer_size` which is in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitRates {
    pub video_bit_rate: u64,
    pub max_video_bit_rate: u64,
    pub buffer_size: u64,
    pub audio_bit_rate: u32,
}

impl BitRates {
    /// Apply the ladder formula to fully resolved rendition parameters.
    pub fn compute(width: u32, height: u32, frame_rate: f64, quality_factor: f64) -> Self {
        let area = u64::from(width) * u64::from(height);
        let video_bit_rate = (area as f64 * frame_rate * quality_factor).round() as u64;
        let max_video_bit_rate = (MAX_RATE_FACTOR * video_bit_rate as f64).round() as u64;

        Self {
            video_bit_rate,
            max_video_bit_rate,
            buffer_size: 2 * max_video_bit_rate,
            audio_bit_rate: audio_bit_rate(area),
        }
    }
}

/// Audio bit rate tier for a resolved pixel area.
pub fn audio_bit_rate(area: u64) -> u32 {
    if area <= 640 * 360 {
        96_000
    } else if area <= 1280 * 720 {
        128_000
    } else {
        192_000
    }
}

/// A fully concrete rendition, ready for the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRendition {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub quality_factor: f64,
    #[serde(flatten)]
    pub bit_rates: BitRates,
}

impl ResolvedRendition {
    /// Rendition playlist file name, e.g. `v1280x720.m3u8`.
    pub fn playlist_name(&self) -> String {
        format!("v{}x{}.m3u8", self.width, self.height)
    }

    /// Segment file name template, e.g. `v1280x720_%03d.ts`. The `%03d`
    /// placeholder is expanded by the encoder, not here.
    pub fn segment_pattern(&self) -> String {
        format!("v{}x{}_%03d.ts", self.width, self.height)
    }
}

impl fmt::Display for ResolvedRendition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @ {:.3} fps, q={} (video {} b/s, max {} b/s, buffer {}, audio {} b/s)",
            self.width,
            self.height,
            self.frame_rate,
            self.quality_factor,
            self.bit_rates.video_bit_rate,
            self.bit_rates.max_video_bit_rate,
            self.bit_rates.buffer_size,
            self.bit_rates.audio_bit_rate,
        )
    }
}

/// Resolve one descriptor against the source metadata.
///
/// - An absent width is derived from the source aspect ratio and bumped to the
///   next even number when odd. An explicit width is used as given.
/// - An absent frame rate keeps the source frame rate.
/// - An absent quality factor becomes [`DEFAULT_QUALITY_FACTOR`].
pub fn plan_rendition(
    format: &FormatDescriptor,
    source: &SourceMetadata,
) -> Result<ResolvedRendition> {
    validate_source(source)?;
    if format.height == 0 {
        return Err(Error::validation(format!("format '{format}' has a zero height")));
    }

    let height = format.height;
    let width = match format.width {
        Some(w) if w > 0 => w,
        _ => {
            let derived = (source.aspect_ratio() * f64::from(height)).round() as u64;
            derived
                .checked_add(derived % 2)
                .and_then(|w| u32::try_from(w).ok())
                .ok_or_else(|| {
                    Error::validation(format!(
                        "format '{format}' resolves to a width too large for a {}x{} source",
                        source.width, source.height
                    ))
                })?
        }
    };
    if width == 0 {
        return Err(Error::validation(format!(
            "format '{format}' resolves to a zero width for a {}x{} source",
            source.width, source.height
        )));
    }

    let frame_rate = format.frame_rate.filter(|r| *r > 0.0).unwrap_or(source.frame_rate);
    let quality_factor = format
        .quality_factor
        .filter(|q| *q > 0.0)
        .unwrap_or(DEFAULT_QUALITY_FACTOR);

    let bit_rates = BitRates::compute(width, height, frame_rate, quality_factor);
    if bit_rates.max_video_bit_rate == 0 {
        return Err(Error::validation(format!(
            "format '{format}' yields a zero bit rate ({}x{} @ {frame_rate} fps, q={quality_factor})",
            width, height
        )));
    }

    Ok(ResolvedRendition {
        width,
        height,
        frame_rate,
        quality_factor,
        bit_rates,
    })
}

/// Resolve every descriptor of a file up front, preserving order.
///
/// Two formats resolving to the same `WxH` would write the same playlist and
/// segment files, so that is rejected with [`Error::Validation`].
pub fn plan_ladder(
    formats: &[FormatDescriptor],
    source: &SourceMetadata,
) -> Result<Vec<ResolvedRendition>> {
    let mut ladder: Vec<ResolvedRendition> = Vec::with_capacity(formats.len());
    for (i, format) in formats.iter().enumerate() {
        let rendition = plan_rendition(format, source)?;
        if let Some(j) = ladder
            .iter()
            .position(|r| (r.width, r.height) == (rendition.width, rendition.height))
        {
            return Err(Error::validation(format!(
                "formats '{}' and '{format}' both resolve to {}x{}",
                formats[j], rendition.width, rendition.height
            )));
        }
        tracing::trace!("format #{i} '{format}' resolved to {rendition}");
        ladder.push(rendition);
    }
    Ok(ladder)
}

fn validate_source(source: &SourceMetadata) -> Result<()> {
    if source.width == 0 || source.height == 0 {
        return Err(Error::validation(format!(
            "source has invalid dimensions {}x{}",
            source.width, source.height
        )));
    }
    if !(source.frame_rate.is_finite() && source.frame_rate > 0.0) {
        return Err(Error::validation(format!(
            "source has invalid frame rate {}",
            source.frame_rate
        )));
    }
    Ok(())
}
