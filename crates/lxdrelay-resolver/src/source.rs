//! Hosting platform contract consumed by the resolver
//!
//! The resolver never talks to GitHub directly. It is handed an
//! `Arc<dyn ReleaseSource>` so tests can substitute an in-memory fake.

use crate::error::UpstreamError;
use crate::types::{Release, TagPage};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

/// Body of a downloaded asset, chunk by chunk
pub type AssetStream = BoxStream<'static, Result<Bytes, UpstreamError>>;

#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch one page of the repository's tags
    async fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<TagPage, UpstreamError>;

    /// Look up the release attached to `tag`.
    ///
    /// A missing release must surface as [`UpstreamError::Status`] carrying
    /// the platform's status code.
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, UpstreamError>;

    /// Plain, unauthenticated GET of an asset download URL
    async fn fetch_asset(&self, url: &str) -> Result<AssetStream, UpstreamError>;
}
