//! Builder patterns for test data construction

use lxdrelay_resolver::{Release, ReleaseAsset, CHECKSUM_ASSET, IMAGE_ASSET};

use super::constants::*;

/// Builder for constructing Release objects with sensible test defaults
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    tag_name: String,
    assets: Vec<ReleaseAsset>,
}

impl ReleaseBuilder {
    /// Create a new ReleaseBuilder with no assets
    pub fn new() -> Self {
        Self {
            tag_name: TAG_UBUNTU_22_04.to_string(),
            assets: Vec::new(),
        }
    }

    /// Set the tag name
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag_name = tag.to_string();
        self
    }

    /// Add an arbitrary asset
    pub fn asset(mut self, name: &str, url: &str) -> Self {
        self.assets.push(ReleaseAsset {
            name: name.to_string(),
            browser_download_url: url.to_string(),
        });
        self
    }

    /// Add the image tarball asset
    pub fn tarball(self, url: &str) -> Self {
        self.asset(IMAGE_ASSET, url)
    }

    /// Add the checksum asset
    pub fn checksum(self, url: &str) -> Self {
        self.asset(CHECKSUM_ASSET, url)
    }

    /// Add both required assets at the default URLs
    pub fn with_image_assets(self) -> Self {
        self.tarball(TARBALL_URL).checksum(CHECKSUM_URL)
    }

    pub fn build(self) -> Release {
        Release {
            tag_name: self.tag_name,
            assets: self.assets,
        }
    }
}

impl Default for ReleaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
