//! Release-hosted image resolution for lxdrelay
//!
//! This crate maps `{owner}/{repo}/{image}[/v{version}]` to the tarball and
//! checksum attached to a GitHub release:
//! - Listing a repository's complete tag catalog (paginated)
//! - Selecting the highest `image/v<semver>` tag when no version is given
//! - Locating `image.tar.xz` and `image.tar.xz.sha256` among release assets
//!
//! # Example
//!
//! ```no_run
//! use lxdrelay_core::RuntimeConfig;
//! use lxdrelay_resolver::{GitHubClient, ImageReference, ImageResolver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::default();
//!     let client = GitHubClient::new(&config.github, &config.network)?;
//!     let resolver = ImageResolver::new(Arc::new(client));
//!
//!     let image = ImageReference::parse("acme/images/ubuntu")?;
//!     let resolved = resolver.resolve_image(&image).await?;
//!     println!("{} {}", resolved.download_url, resolved.checksum);
//!
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod catalog;
pub mod error;
pub mod github;
pub mod resolver;
pub mod service;
pub mod source;
pub mod tags;
pub mod types;

// Re-export main types for convenience
pub use assets::AssetLocator;
pub use catalog::{list_all_tags, TAG_PAGE_SIZE};
pub use error::{ChecksumError, ResolveError, UpstreamError};
pub use github::{ClientError, GitHubClient};
pub use resolver::{select_latest, VersionResolver};
pub use service::ImageResolver;
pub use source::{AssetStream, ReleaseSource};
pub use tags::{normalize_version, parse_image_version, parse_tag};
pub use types::{
    ImageReference, Release, ReleaseAsset, ReleaseTag, ResolvedImage, TagPage, TaggedVersion,
    CHECKSUM_ASSET, CHECKSUM_LEN, IMAGE_ASSET,
};
