use crate::error::ResolveError;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the release asset holding the image tarball
pub const IMAGE_ASSET: &str = "image.tar.xz";

/// Name of the release asset holding the tarball's SHA-256 digest
pub const CHECKSUM_ASSET: &str = "image.tar.xz.sha256";

/// Number of bytes read from the checksum asset.
///
/// The file is expected to start with a hex-encoded SHA-256 digest. Anything
/// after the first 64 bytes (a newline, `sha256sum`'s file name column) is
/// never read.
pub const CHECKSUM_LEN: usize = 64;

/// Caller-supplied image reference: `{owner}/{repo}/{image}[/v{version}]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Repository owner (e.g., "acme")
    pub owner: String,
    /// Repository name (e.g., "images")
    pub repo: String,
    /// Image name, the part of a tag before `/v` (e.g., "ubuntu")
    pub image: String,
    /// Literal version without the leading `v`; `None` resolves the latest
    pub version: Option<String>,
}

impl ImageReference {
    /// Reference to the latest version of an image
    pub fn latest(
        owner: impl Into<String>,
        repo: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            image: image.into(),
            version: None,
        }
    }

    /// Pin the reference to an explicit version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parse a reference string like "acme/images/ubuntu/v22.04.0"
    ///
    /// The version is kept verbatim; it is not checked for semver syntax.
    pub fn parse(s: &str) -> Result<Self, ResolveError> {
        let parts: Vec<&str> = s.trim_matches('/').split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ResolveError::invalid_reference(s, "empty path segment"));
        }

        match parts.as_slice() {
            [owner, repo, image] => Ok(Self::latest(*owner, *repo, *image)),
            [owner, repo, image, version] => {
                let version = version
                    .strip_prefix('v')
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| {
                        ResolveError::invalid_reference(s, "version must look like v<semver>")
                    })?;
                Ok(Self::latest(*owner, *repo, *image).with_version(version))
            }
            _ => Err(ResolveError::invalid_reference(
                s,
                "expected owner/repo/image[/vVERSION]",
            )),
        }
    }

    /// Release tag for the explicit version, if one was given
    pub fn explicit_tag(&self) -> Option<ReleaseTag> {
        self.version
            .as_deref()
            .map(|version| ReleaseTag::new(&self.image, version))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.repo, self.image)?;
        if let Some(version) = &self.version {
            write!(f, "/v{}", version)?;
        }
        Ok(())
    }
}

/// Fully qualified release tag: `<image>/v<version>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    pub fn new(image: &str, version: impl fmt::Display) -> Self {
        Self(format!("{}/v{}", image, version))
    }

    /// Tag a resolved version was read from, spelled as upstream wrote it
    pub fn for_version(image: &str, version: &TaggedVersion) -> Self {
        Self::new(image, &version.raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReleaseTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Version parsed from a tag, with the tag's own spelling of it
///
/// `ubuntu/v22.04.0` orders as `22.4.0` but its release is only reachable
/// through the literal `22.04.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVersion {
    /// Parsed version used for ordering
    pub version: Version,
    /// Version text exactly as it appears after `/v` in the tag
    pub raw: String,
}

impl TaggedVersion {
    pub fn new(version: Version, raw: impl Into<String>) -> Self {
        Self {
            version,
            raw: raw.into(),
        }
    }
}

impl fmt::Display for TaggedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One page of a repository's tag listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPage {
    /// Tag names in upstream order
    pub tags: Vec<String>,
    /// Page number to request next, `None` on the last page
    pub next_page: Option<u32>,
}

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "ubuntu/v22.04.0")
    pub tag_name: String,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,
}

/// Final resolution result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    /// Tarball download URL
    pub download_url: String,
    /// Raw checksum text as read from the checksum asset
    pub checksum: String,
}
