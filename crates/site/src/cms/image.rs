//! Image CDN URLs for asset references.
//!
//! Asset references look like `image-<id>-<width>x<height>-<ext>` and map to
//! `https://cdn.sanity.io/images/<project>/<dataset>/<id>-<width>x<height>.<ext>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ImageRef;

static ASSET_REF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^image-([A-Za-z0-9]+)-(\d+)x(\d+)-([a-z0-9]+)$").ok());

/// Parsed asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl AssetId {
    /// Parse an asset reference; anything unrecognized yields `None`.
    pub fn parse(reference: &str) -> Option<Self> {
        let caps = ASSET_REF.as_ref()?.captures(reference.trim())?;
        Some(Self {
            id: caps.get(1)?.as_str().to_string(),
            width: caps.get(2)?.as_str().parse().ok()?,
            height: caps.get(3)?.as_str().parse().ok()?,
            format: caps.get(4)?.as_str().to_string(),
        })
    }
}

/// Builds CDN URLs for one project and dataset.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Full-size URL of an asset.
    pub fn source(&self, image: &ImageRef) -> Option<String> {
        let asset = AssetId::parse(image.asset_ref()?)?;
        Some(self.base_url(&asset))
    }

    /// URL of an asset cropped to `width` x `height`.
    pub fn cropped(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        let asset = AssetId::parse(image.asset_ref()?)?;
        Some(format!(
            "{}?w={width}&h={height}&fit=crop&auto=format",
            self.base_url(&asset)
        ))
    }

    /// URL of an asset scaled to `width`, keeping its aspect ratio.
    pub fn scaled(&self, image: &ImageRef, width: u32) -> Option<String> {
        let asset = AssetId::parse(image.asset_ref()?)?;
        Some(format!("{}?w={width}&auto=format", self.base_url(&asset)))
    }

    fn base_url(&self, asset: &AssetId) -> String {
        format!(
            "https://cdn.sanity.io/images/{}/{}/{}-{}x{}.{}",
            self.project_id, self.dataset, asset.id, asset.width, asset.height, asset.format
        )
    }
}
