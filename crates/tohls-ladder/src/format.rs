//! Format descriptors: the user-facing `SIZE:FRAMERATE:QUALITY` grammar.
//!
//! ```text
//! FORMAT    = SIZE:FRAMERATE:QUALITY
//! SIZE      = WxH | Hp
//! FRAMERATE = <decimal> | EMPTY
//! QUALITY   = <decimal> | EMPTY
//! ```
//!
//! `Hp` leaves the width unset so it can be derived from the source aspect
//! ratio. Empty frame rate and quality fields fall back to the source frame
//! rate and [`DEFAULT_QUALITY_FACTOR`] respectively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tohls_core::{Error, Result};

/// Named quality factors covering the conventional range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Low,
    LowMed,
    Med,
    MedHigh,
    High,
}

impl QualityLevel {
    /// All levels, lowest first.
    pub const ALL: [QualityLevel; 5] = [
        QualityLevel::Low,
        QualityLevel::LowMed,
        QualityLevel::Med,
        QualityLevel::MedHigh,
        QualityLevel::High,
    ];

    /// Name as used in config and help text (`low`, `low_med`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            QualityLevel::Low => "low",
            QualityLevel::LowMed => "low_med",
            QualityLevel::Med => "med",
            QualityLevel::MedHigh => "med_high",
            QualityLevel::High => "high",
        }
    }

    /// Multiplier used in the bit rate formula.
    pub const fn factor(self) -> f64 {
        match self {
            QualityLevel::Low => 0.07,
            QualityLevel::LowMed => 0.09,
            QualityLevel::Med => 0.11,
            QualityLevel::MedHigh => 0.13,
            QualityLevel::High => 0.15,
        }
    }
}

/// Quality factor used when a format leaves `QUALITY` empty.
pub const DEFAULT_QUALITY_FACTOR: f64 = QualityLevel::Med.factor();

/// A possibly-partial rendition request parsed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Output width; `None` means derive from the source aspect ratio.
    pub width: Option<u32>,
    /// Output height, always present and non-zero.
    pub height: u32,
    /// Output frame rate; `None` means keep the source frame rate.
    pub frame_rate: Option<f64>,
    /// Quality factor; `None` means [`DEFAULT_QUALITY_FACTOR`].
    pub quality_factor: Option<f64>,
}

impl FormatDescriptor {
    /// Height-only descriptor with every other field unset.
    pub fn from_height(height: u32) -> Self {
        Self {
            width: None,
            height,
            frame_rate: None,
            quality_factor: None,
        }
    }

    /// Parse a `SIZE:FRAMERATE:QUALITY` string.
    ///
    /// Every failure maps to [`Error::MalformedFormat`] carrying the input.
    pub fn parse(input: &str) -> Result<Self> {
        let malformed = || Error::malformed_format(input);

        let fields: Vec<&str> = input.split(':').collect();
        let [size, frame_rate, quality] = fields.as_slice() else {
            return Err(malformed());
        };

        let (width, height) = match size.strip_suffix('p') {
            Some(h) => (None, parse_dimension(h).ok_or_else(malformed)?),
            None => {
                let (w, h) = size.split_once('x').ok_or_else(malformed)?;
                (
                    Some(parse_dimension(w).ok_or_else(malformed)?),
                    parse_dimension(h).ok_or_else(malformed)?,
                )
            }
        };

        Ok(Self {
            width,
            height,
            frame_rate: parse_optional_real(frame_rate).ok_or_else(malformed)?,
            quality_factor: parse_optional_real(quality).ok_or_else(malformed)?,
        })
    }
}

/// Positive integer dimension.
fn parse_dimension(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|v| *v > 0)
}

/// `Some(None)` for an empty field or a literal zero, `Some(Some(v))` for a
/// positive finite value, `None` when the field is malformed.
fn parse_optional_real(s: &str) -> Option<Option<f64>> {
    if s.is_empty() {
        return Some(None);
    }
    let v = s.parse::<f64>().ok()?;
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    Some((v > 0.0).then_some(v))
}

impl FromStr for FormatDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            Some(w) => write!(f, "{}x{}:", w, self.height)?,
            None => write!(f, "{}p:", self.height)?,
        }
        if let Some(fps) = self.frame_rate {
            write!(f, "{fps}")?;
        }
        f.write_str(":")?;
        if let Some(q) = self.quality_factor {
            write!(f, "{q}")?;
        }
        Ok(())
    }
}
