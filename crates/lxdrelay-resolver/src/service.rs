use crate::assets::AssetLocator;
use crate::error::ResolveError;
use crate::resolver::VersionResolver;
use crate::source::ReleaseSource;
use crate::types::{ImageReference, ReleaseTag, ResolvedImage};
use std::sync::Arc;
use tracing::{info, warn};

/// Request-facing entry point: image reference → tarball URL + checksum
///
/// Holds no state besides the shared, read-only upstream client; every call
/// resolves from scratch.
pub struct ImageResolver {
    versions: VersionResolver,
    assets: AssetLocator,
}

impl ImageResolver {
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self {
            versions: VersionResolver::new(Arc::clone(&source)),
            assets: AssetLocator::new(source),
        }
    }

    /// Resolve an image reference.
    ///
    /// An explicit version goes straight to the release lookup; the tag list
    /// is only read when the latest version has to be discovered.
    pub async fn resolve_image(
        &self,
        image: &ImageReference,
    ) -> Result<ResolvedImage, ResolveError> {
        let result = self.resolve_inner(image).await;
        if let Err(e) = &result {
            warn!(
                owner = %image.owner,
                repo = %image.repo,
                image = %image.image,
                status = e.status_code().as_u16(),
                "Resolution failed: {}",
                e
            );
        }
        result
    }

    async fn resolve_inner(&self, image: &ImageReference) -> Result<ResolvedImage, ResolveError> {
        let tag = match image.explicit_tag() {
            Some(tag) => tag,
            None => {
                info!(
                    "Finding latest tag for {}/{}/{}",
                    image.owner, image.repo, image.image
                );
                let version = self
                    .versions
                    .find_latest_version(&image.owner, &image.repo, &image.image)
                    .await?;
                ReleaseTag::for_version(&image.image, &version)
            }
        };

        info!(
            "Looking up release for {}/{}/{}",
            image.owner, image.repo, tag
        );
        self.assets
            .resolve_assets(&image.owner, &image.repo, &tag)
            .await
    }
}
