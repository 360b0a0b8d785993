//! Wire types for the game catalogue's search endpoint.

use serde::Deserialize;

use crate::domain::review::ArtworkCandidate;

/// Top-level search response: `{"results": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogueResponseDto {
    #[serde(default)]
    pub results: Vec<CatalogueHitDto>,
}

/// One search hit. Only the artwork fields matter; everything else in the
/// payload is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogueHitDto {
    pub background_image: Option<String>,
    pub released: Option<String>,
}

impl CatalogueResponseDto {
    /// Convert hits into candidates, dropping any without artwork. A hit
    /// without an image has nothing to offer the commit step.
    pub(crate) fn into_candidates(self) -> Vec<ArtworkCandidate> {
        self.results
            .into_iter()
            .filter_map(|hit| {
                hit.background_image.map(|background_image| ArtworkCandidate {
                    background_image,
                    released: hit.released,
                })
            })
            .collect()
    }
}
