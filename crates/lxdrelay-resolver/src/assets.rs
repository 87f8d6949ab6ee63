//! Release asset lookup: tag → tarball URL + checksum

use crate::error::{ChecksumError, ResolveError};
use crate::source::ReleaseSource;
use crate::types::{ReleaseTag, ResolvedImage, CHECKSUM_ASSET, CHECKSUM_LEN, IMAGE_ASSET};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::debug;

/// Locates the image tarball and checksum among a release's assets
pub struct AssetLocator {
    source: Arc<dyn ReleaseSource>,
}

impl AssetLocator {
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    /// Resolve the release tagged `tag` to its tarball URL and checksum
    pub async fn resolve_assets(
        &self,
        owner: &str,
        repo: &str,
        tag: &ReleaseTag,
    ) -> Result<ResolvedImage, ResolveError> {
        let tag = tag.as_str();
        let release = self
            .source
            .get_release_by_tag(owner, repo, tag)
            .await
            .map_err(|e| ResolveError::release_lookup(owner, repo, tag, e))?;

        debug!(
            "Release {} of {}/{} has {} assets",
            tag,
            owner,
            repo,
            release.assets.len()
        );

        let mut download_url = None;
        let mut checksum = None;

        for asset in &release.assets {
            match asset.name.as_str() {
                IMAGE_ASSET => download_url = Some(asset.browser_download_url.clone()),
                CHECKSUM_ASSET => {
                    let sum = self
                        .read_checksum(&asset.browser_download_url)
                        .await
                        .map_err(|e| ResolveError::checksum_fetch(owner, repo, tag, e))?;
                    checksum = Some(sum);
                }
                _ => {}
            }
        }

        match (download_url, checksum) {
            (Some(download_url), Some(checksum)) => Ok(ResolvedImage {
                download_url,
                checksum,
            }),
            (url, sum) => {
                let missing: Vec<&str> = [
                    url.is_none().then_some(IMAGE_ASSET),
                    sum.is_none().then_some(CHECKSUM_ASSET),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ResolveError::asset_missing(
                    owner,
                    repo,
                    tag,
                    missing.join(" and "),
                ))
            }
        }
    }

    /// Read exactly [`CHECKSUM_LEN`] bytes from the checksum asset.
    ///
    /// Reading stops once enough bytes have arrived; the rest of the body is
    /// dropped with the stream.
    async fn read_checksum(&self, url: &str) -> Result<String, ChecksumError> {
        let mut stream = self.source.fetch_asset(url).await?;
        let mut buf = Vec::with_capacity(CHECKSUM_LEN);

        while buf.len() < CHECKSUM_LEN {
            match stream.next().await {
                Some(chunk) => {
                    let chunk = chunk?;
                    let wanted = CHECKSUM_LEN - buf.len();
                    buf.extend_from_slice(&chunk[..chunk.len().min(wanted)]);
                }
                None => {
                    return Err(ChecksumError::ShortRead {
                        read: buf.len(),
                        expected: CHECKSUM_LEN,
                    })
                }
            }
        }

        String::from_utf8(buf).map_err(|_| ChecksumError::NotUtf8)
    }
}
