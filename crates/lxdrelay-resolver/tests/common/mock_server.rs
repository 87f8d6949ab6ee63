//! Mock server helpers for GitHub client testing

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Serve one page of `/repos/{OWNER}/{REPO}/tags`, linking to `next` when given
pub async fn mock_tag_page(server: &MockServer, page: u32, tags: &[&str], next: Option<u32>) {
    let body: Vec<_> = tags.iter().map(|name| json!({ "name": name })).collect();
    let mut response = ResponseTemplate::new(200).set_body_json(body);
    if let Some(next) = next {
        response = response.insert_header(
            "link",
            format!(
                "<{}/repositories/1/tags?per_page=50&page={}>; rel=\"next\"",
                server.uri(),
                next
            )
            .as_str(),
        );
    }

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/tags", OWNER, REPO)))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "50"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Serve a release whose assets live on the same mock server
pub async fn mock_release(server: &MockServer, tag: &str, asset_names: &[&str]) {
    let assets: Vec<_> = asset_names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "size": 1,
                "browser_download_url": format!("{}/download/{}/{}", server.uri(), tag, name),
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases/tags/{}", OWNER, REPO, tag)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "tag_name": tag,
            "assets": assets,
        })))
        .mount(server)
        .await;
}

/// Serve an asset body under `/download/{tag}/{name}`
pub async fn mock_asset(server: &MockServer, tag: &str, name: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{}/{}", tag, name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Answer every unmatched GitHub API path the way GitHub does for missing objects
pub async fn mock_github_not_found(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest",
        })))
        .with_priority(u8::MAX)
        .mount(server)
        .await;
}
