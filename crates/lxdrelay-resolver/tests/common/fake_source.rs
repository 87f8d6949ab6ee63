//! In-memory `ReleaseSource` for resolver tests

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use lxdrelay_resolver::{AssetStream, Release, ReleaseSource, TagPage, UpstreamError};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fake hosting platform backed by plain collections
#[derive(Default)]
pub struct FakeSource {
    tags: Vec<String>,
    releases: HashMap<String, Release>,
    assets: HashMap<String, Vec<Bytes>>,
    fail_tag_page: Option<(u32, StatusCode)>,
    tag_calls: AtomicUsize,
    release_calls: AtomicUsize,
    asset_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_release(mut self, release: Release) -> Self {
        self.releases.insert(release.tag_name.clone(), release);
        self
    }

    /// Serve `body` at `url` in a single chunk
    pub fn with_asset(self, url: &str, body: &[u8]) -> Self {
        self.with_chunked_asset(url, &[body])
    }

    /// Serve `url` as the given sequence of chunks
    pub fn with_chunked_asset(mut self, url: &str, chunks: &[&[u8]]) -> Self {
        self.assets.insert(
            url.to_string(),
            chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect(),
        );
        self
    }

    /// Fail the tag listing when `page` is requested
    pub fn failing_tag_page(mut self, page: u32, status: StatusCode) -> Self {
        self.fail_tag_page = Some((page, status));
        self
    }

    pub fn tag_calls(&self) -> usize {
        self.tag_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub fn asset_calls(&self) -> usize {
        self.asset_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for FakeSource {
    async fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<TagPage, UpstreamError> {
        self.tag_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((failing, status)) = self.fail_tag_page {
            if failing == page {
                return Err(UpstreamError::status(
                    format!("fake://repos/{}/{}/tags?page={}", owner, repo, page),
                    status,
                    "listing failed",
                ));
            }
        }

        let per_page = per_page as usize;
        let start = (page as usize - 1) * per_page;
        let end = (start + per_page).min(self.tags.len());
        let tags = self.tags.get(start..end).unwrap_or_default().to_vec();
        let next_page = (end < self.tags.len()).then_some(page + 1);

        Ok(TagPage { tags, next_page })
    }

    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, UpstreamError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);

        self.releases.get(tag).cloned().ok_or_else(|| {
            UpstreamError::status(
                format!("fake://repos/{}/{}/releases/tags/{}", owner, repo, tag),
                StatusCode::NOT_FOUND,
                "Not Found",
            )
        })
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetStream, UpstreamError> {
        self.asset_calls.fetch_add(1, Ordering::SeqCst);

        let chunks = self
            .assets
            .get(url)
            .cloned()
            .ok_or_else(|| UpstreamError::status(url, StatusCode::NOT_FOUND, "Not Found"))?;

        Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
    }
}
