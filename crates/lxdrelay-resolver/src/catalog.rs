//! Tag catalog: the complete tag list of a repository

use crate::error::UpstreamError;
use crate::source::ReleaseSource;
use tracing::{debug, trace};

/// Tags requested per listing page
pub const TAG_PAGE_SIZE: u8 = 50;

/// List every tag of `owner/repo` in upstream order.
///
/// Pages are fetched one after another until the platform reports no next
/// page. A failure on any page aborts the whole listing; nothing is retried
/// and no partial list is returned.
pub async fn list_all_tags(
    source: &dyn ReleaseSource,
    owner: &str,
    repo: &str,
) -> Result<Vec<String>, UpstreamError> {
    let mut all_tags = Vec::new();
    let mut page = 1;

    loop {
        trace!("Listing tags of {}/{}, page {}", owner, repo, page);

        let listing = source.list_tags(owner, repo, page, TAG_PAGE_SIZE).await?;
        all_tags.extend(listing.tags);

        match listing.next_page {
            Some(next) if next > page => page = next,
            Some(next) => {
                // A next page that does not move forward would loop forever
                debug!(
                    "Ignoring non-advancing next page {} after page {} of {}/{}",
                    next, page, owner, repo
                );
                break;
            }
            None => break,
        }
    }

    debug!("Found {} tags in {}/{}", all_tags.len(), owner, repo);
    Ok(all_tags)
}
