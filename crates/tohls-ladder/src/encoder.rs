//! The [`RenditionEncoder`] capability.

use std::path::Path;

use async_trait::async_trait;
use tohls_core::Result;

use crate::plan::ResolvedRendition;

/// Produces the segments and playlist of one rendition.
///
/// Implementations must be safe to share across threads (`Send + Sync`) so
/// that several renditions of a file can be encoded concurrently.
#[async_trait]
pub trait RenditionEncoder: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Encode `source` into `rendition`.
    ///
    /// Returns the rendition playlist file name to reference from the master
    /// playlist. Any error is final for the rendition; callers do not retry.
    async fn encode(&self, source: &Path, rendition: &ResolvedRendition) -> Result<String>;
}
