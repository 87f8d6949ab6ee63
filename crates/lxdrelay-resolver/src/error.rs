//! Error types for image resolution

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the hosting platform
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The platform answered with a non-success status
    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: StatusCode,
        message: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, reset)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read or decoded
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl UpstreamError {
    pub fn status(url: impl Into<String>, status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn decode(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status reported by the platform, if the failure carried one
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            Self::Decode { .. } => None,
        }
    }
}

/// Why a checksum asset could not be read
#[derive(Error, Debug)]
pub enum ChecksumError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("checksum file ended after {read} of {expected} bytes")]
    ShortRead { read: usize, expected: usize },

    #[error("checksum is not valid UTF-8")]
    NotUtf8,
}

/// Image resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No tag of the image parses as a semantic version
    #[error("no tagged version available for {image} in {owner}/{repo}")]
    NoVersion {
        owner: String,
        repo: String,
        image: String,
    },

    /// Tag listing failed
    #[error("failed to list tags of {owner}/{repo}: {source}")]
    Upstream {
        owner: String,
        repo: String,
        #[source]
        source: UpstreamError,
    },

    /// Release-by-tag lookup failed
    #[error("failed to get release {tag} of {owner}/{repo}: {source}")]
    ReleaseLookup {
        owner: String,
        repo: String,
        tag: String,
        #[source]
        source: UpstreamError,
    },

    /// Release exists but lacks the tarball and/or checksum asset
    #[error("release {tag} of {owner}/{repo} is missing {missing}")]
    AssetMissing {
        owner: String,
        repo: String,
        tag: String,
        missing: String,
    },

    /// Checksum asset exists but could not be read in full
    #[error("failed to read checksum of release {tag} of {owner}/{repo}: {source}")]
    ChecksumFetch {
        owner: String,
        repo: String,
        tag: String,
        #[source]
        source: ChecksumError,
    },

    /// Malformed reference string
    #[error("invalid image reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },
}

impl ResolveError {
    pub fn no_version(owner: &str, repo: &str, image: &str) -> Self {
        Self::NoVersion {
            owner: owner.to_string(),
            repo: repo.to_string(),
            image: image.to_string(),
        }
    }

    pub fn upstream(owner: &str, repo: &str, source: UpstreamError) -> Self {
        Self::Upstream {
            owner: owner.to_string(),
            repo: repo.to_string(),
            source,
        }
    }

    pub fn release_lookup(owner: &str, repo: &str, tag: &str, source: UpstreamError) -> Self {
        Self::ReleaseLookup {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            source,
        }
    }

    pub fn asset_missing(owner: &str, repo: &str, tag: &str, missing: impl Into<String>) -> Self {
        Self::AssetMissing {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            missing: missing.into(),
        }
    }

    pub fn checksum_fetch(owner: &str, repo: &str, tag: &str, source: ChecksumError) -> Self {
        Self::ChecksumFetch {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            source,
        }
    }

    pub fn invalid_reference(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status to answer the caller with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoVersion { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { source, .. } | Self::ReleaseLookup { source, .. } => source
                .status_code()
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::AssetMissing { .. } | Self::ChecksumFetch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidReference { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> UpstreamError {
        UpstreamError::status(
            "https://api.github.com/repos/acme/images/releases/tags/ubuntu%2Fv1.0.0",
            StatusCode::NOT_FOUND,
            "Not Found",
        )
    }

    #[test]
    fn test_no_version_maps_to_not_found() {
        let err = ResolveError::no_version("acme", "images", "ubuntu");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "no tagged version available for ubuntu in acme/images"
        );
    }

    #[test]
    fn test_upstream_status_is_forwarded() {
        let err = ResolveError::release_lookup("acme", "images", "ubuntu/v1.0.0", not_found());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let forbidden = UpstreamError::status("u", StatusCode::FORBIDDEN, "rate limited");
        let err = ResolveError::upstream("acme", "images", forbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_upstream_without_status_is_internal() {
        let err = ResolveError::upstream("acme", "images", UpstreamError::decode("u", "bad json"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_integrity_errors_are_internal() {
        let missing = ResolveError::asset_missing("acme", "images", "ubuntu/v1.0.0", "image.tar.xz");
        assert_eq!(missing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let short = ResolveError::checksum_fetch(
            "acme",
            "images",
            "ubuntu/v1.0.0",
            ChecksumError::ShortRead {
                read: 10,
                expected: 64,
            },
        );
        assert_eq!(short.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(short.to_string().contains("10 of 64 bytes"));
    }
}
