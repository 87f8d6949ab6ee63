use crate::catalog::list_all_tags;
use crate::error::ResolveError;
use crate::source::ReleaseSource;
use crate::tags::parse_image_version;
use crate::types::TaggedVersion;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves the latest version of an image from a repository's tags
pub struct VersionResolver {
    source: Arc<dyn ReleaseSource>,
}

impl VersionResolver {
    /// Create a new version resolver
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    /// Find the highest semantic version tagged for `image`
    ///
    /// # Arguments
    /// * `owner` / `repo` - Repository holding the tags (e.g., "acme"/"images")
    /// * `image` - Image name, matched exactly against the part before `/v`
    ///
    /// # Returns
    /// The highest version among tags `image/v<semver>`, still spelled as in
    /// its tag; tags that are not valid semver are skipped.
    pub async fn find_latest_version(
        &self,
        owner: &str,
        repo: &str,
        image: &str,
    ) -> Result<TaggedVersion, ResolveError> {
        debug!("Finding latest version of {} in {}/{}", image, owner, repo);

        let tags = list_all_tags(self.source.as_ref(), owner, repo)
            .await
            .map_err(|e| ResolveError::upstream(owner, repo, e))?;

        let latest = select_latest(tags.iter().filter_map(|tag| parse_image_version(tag, image)))
            .ok_or_else(|| ResolveError::no_version(owner, repo, image))?;

        debug!("Latest version of {} in {}/{} is {}", image, owner, repo, latest);
        Ok(latest)
    }
}

/// Highest version by semver precedence.
///
/// A candidate replaces the current best only when it is strictly greater,
/// so among versions of equal precedence (e.g. `22.04.0` and `22.4.0`, or
/// ones differing only in build metadata) the first one seen wins.
pub fn select_latest(
    versions: impl IntoIterator<Item = TaggedVersion>,
) -> Option<TaggedVersion> {
    versions.into_iter().fold(None, |best, candidate| match best {
        Some(best) if candidate.version.cmp_precedence(&best.version) != Ordering::Greater => {
            trace!("Keeping {} over {}", best, candidate);
            Some(best)
        }
        _ => Some(candidate),
    })
}
