use crate::error::UpstreamError;
use crate::source::{AssetStream, ReleaseSource};
use crate::types::{Release, TagPage};
use async_trait::async_trait;
use futures_util::StreamExt;
use lxdrelay_core::{GitHubConfig, NetworkConfig};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Errors building a [`GitHubClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid GitHub API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// GitHub REST client for tags, releases and asset downloads
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: Url,
    /// Token for API calls, never attached to asset downloads
    auth_token: Option<String>,
    api_version: String,
}

impl GitHubClient {
    /// Create a client from the runtime configuration
    pub fn new(github: &GitHubConfig, network: &NetworkConfig) -> Result<Self, ClientError> {
        let api_url = Url::parse(&github.api_url).map_err(|e| ClientError::InvalidApiUrl {
            url: github.api_url.clone(),
            reason: e.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ClientError::InvalidApiUrl {
                url: github.api_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder().user_agent(&network.user_agent);
        if network.http_timeout_secs > 0 {
            builder = builder.timeout(network.http_timeout());
        }
        if network.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(network.connect_timeout());
        }

        Ok(Self {
            client: builder.build()?,
            api_url,
            auth_token: github.token.clone(),
            api_version: github.api_version.clone(),
        })
    }

    /// Build `{api_url}/{segments...}`, escaping each segment
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET with the API headers (and credentials, when configured)
    fn api_get(&self, url: &Url) -> RequestBuilder {
        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static(GITHUB_JSON))
            .header("X-GitHub-Api-Version", &self.api_version);
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        request
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::transport(url, e))?;

        if !response.status().is_success() {
            return Err(error_for_status(url, response).await);
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, UpstreamError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(url, e))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::decode(url, e))
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<TagPage, UpstreamError> {
        let mut url = self.endpoint(["repos", owner, repo, "tags"]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        debug!("Listing tags from: {}", url);

        let response = self.send(url.as_str(), self.api_get(&url)).await?;

        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_next_page);

        let entries: Vec<TagEntry> = Self::decode(url.as_str(), response).await?;
        trace!("Page {} has {} tags, next={:?}", page, entries.len(), next_page);

        Ok(TagPage {
            tags: entries.into_iter().map(|t| t.name).collect(),
            next_page,
        })
    }

    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, UpstreamError> {
        // The tag's own slashes stay literal path separators, as GitHub expects
        let url = self.endpoint(
            ["repos", owner, repo, "releases", "tags"]
                .into_iter()
                .chain(tag.split('/')),
        );

        debug!("Fetching release from: {}", url);

        let response = self.send(url.as_str(), self.api_get(&url)).await?;
        Self::decode(url.as_str(), response).await
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetStream, UpstreamError> {
        debug!("Downloading asset: {}", url);

        let response = self.send(url, self.client.get(url)).await?;

        let url = url.to_string();
        Ok(response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| UpstreamError::transport(url.clone(), e)))
            .boxed())
    }
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

async fn error_for_status(url: &str, response: Response) -> UpstreamError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("(no response body)")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };
    UpstreamError::status(url, status, message)
}

/// Page number of the `rel="next"` entry of a Link header
///
/// Format: `<https://api.github.com/repositories/1/tags?per_page=50&page=2>; rel="next", <...>; rel="last"`
fn parse_next_page(link: &str) -> Option<u32> {
    link.split(',')
        .map(str::trim)
        .find(|part| part.contains("rel=\"next\""))
        .and_then(|part| {
            let start = part.find('<')?;
            let end = part.find('>')?;
            Url::parse(part.get(start + 1..end)?).ok()
        })
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse().ok())
        })
}
