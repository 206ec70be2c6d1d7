//! GitHub repository search harvester

use super::{HarvestFailure, HarvestReport, Harvester, USER_AGENT};
use crate::entry::RawEntry;
use crate::error::HarvestError;
use crate::store::ArtifactKind;
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: &str = "100";

#[derive(Debug, Clone)]
pub struct GithubSearchOptions {
    pub api_url: String,
    pub token: Option<String>,
    pub terms: Vec<String>,
    pub min_stars: u64,
    pub min_forks: u64,
    pub fetch_readme: bool,
    pub max_pages: u32,
    pub request_timeout: Duration,
    /// Sleep after a failed term before moving on.
    pub failure_pause: Duration,
}

impl Default for GithubSearchOptions {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            terms: Vec::new(),
            min_stars: 10,
            min_forks: 10,
            fetch_readme: true,
            max_pages: 10,
            request_timeout: Duration::from_secs(30),
            failure_pause: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    #[serde(default)]
    content: String,
}

pub struct GithubSearch {
    client: Client,
    options: GithubSearchOptions,
}

impl GithubSearch {
    pub fn new(options: GithubSearchOptions) -> Result<Self, HarvestError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        if let Some(token) = options.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| HarvestError::decode("GITHUB_TOKEN", e))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| HarvestError::transport(&options.api_url, e))?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &GithubSearchOptions {
        &self.options
    }

    /// All kept repositories for one term, following pagination.
    async fn search_term(&self, term: &str) -> Result<Vec<RawEntry>, HarvestError> {
        let base = format!("{}/search/repositories", self.api_base());
        let first = Url::parse_with_params(
            &base,
            &[("q", term), ("per_page", PER_PAGE), ("page", "1")],
        )
        .map_err(|e| HarvestError::decode(&base, e))?;

        let mut next = Some(first.to_string());
        let mut pages = 0u32;
        let mut entries = Vec::new();

        while let Some(url) = next.take() {
            if pages >= self.options.max_pages {
                debug!(term, pages, "Page limit reached");
                break;
            }
            pages += 1;
            info!(term, url = %url, "Searching repositories");

            let response = self.get(&url).await?;
            next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_link);
            let page: SearchPage = decode_json(&url, response).await?;
            debug!(term, items = page.items.len(), "Received search page");

            for item in page.items {
                if item.stargazers_count < self.options.min_stars
                    || item.forks_count < self.options.min_forks
                {
                    continue;
                }
                entries.push(RawEntry {
                    name: item.full_name,
                    description: item.description.unwrap_or_default(),
                    url: item.html_url,
                    stars: item.stargazers_count,
                    forks: item.forks_count,
                    readme_text: String::new(),
                    markers: None,
                });
            }
        }

        Ok(entries)
    }

    /// README body for `full_name`, or an empty string when unavailable.
    async fn fetch_readme(&self, full_name: &str) -> String {
        let api = self.api_base();
        let candidates = [
            format!("{}/repos/{}/readme", api, full_name),
            format!("{}/repos/{}/contents/README.mdx", api, full_name),
        ];

        let mut last_error = None;
        for url in &candidates {
            match self.fetch_content(url).await {
                Ok(text) => return text,
                Err(e) => last_error = Some(e),
            }
        }

        if let Some(e) = last_error {
            warn!(repo = full_name, error = %e.chain(), "README unavailable");
        }
        String::new()
    }

    async fn fetch_content(&self, url: &str) -> Result<String, HarvestError> {
        let response = self.get(url).await?;
        let body: ContentBody = decode_json(url, response).await?;
        decode_base64(&body.content).map_err(|reason| HarvestError::decode(url, reason))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HarvestError::transport(url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim() == "0")
            .unwrap_or(false);
        if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted)
        {
            return Err(HarvestError::RateLimited {
                url: url.to_string(),
            });
        }

        Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }

    fn api_base(&self) -> &str {
        self.options.api_url.trim_end_matches('/')
    }
}

#[async_trait]
impl Harvester for GithubSearch {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Search
    }

    fn name(&self) -> &str {
        "github-search"
    }

    async fn harvest(&self) -> Result<HarvestReport, HarvestError> {
        let mut report = HarvestReport::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, term) in self.options.terms.iter().enumerate() {
            match self.search_term(term).await {
                Ok(entries) => {
                    let before = report.entries.len();
                    for mut entry in entries {
                        if !seen.insert(entry.name.clone()) {
                            continue;
                        }
                        if self.options.fetch_readme {
                            entry.readme_text = self.fetch_readme(&entry.name).await;
                        }
                        report.entries.push(entry);
                    }
                    info!(
                        term = term.as_str(),
                        kept = report.entries.len() - before,
                        "Search term complete"
                    );
                }
                Err(e) => {
                    warn!(term = term.as_str(), error = %e.chain(), "Search term failed");
                    report.failures.push(HarvestFailure {
                        term: term.clone(),
                        reason: e.chain(),
                    });
                    let is_last = index + 1 == self.options.terms.len();
                    if !is_last && !self.options.failure_pause.is_zero() {
                        info!(
                            seconds = self.options.failure_pause.as_secs(),
                            "Pausing before next term"
                        );
                        tokio::time::sleep(self.options.failure_pause).await;
                    }
                }
            }
        }

        Ok(report)
    }
}

async fn decode_json<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, HarvestError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| HarvestError::transport(url, e))?;
    serde_json::from_slice(&bytes).map_err(|e| HarvestError::decode(url, e))
}

/// Decodes a GitHub contents payload, which wraps base64 at 60 columns.
fn decode_base64(content: &str) -> Result<String, String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| e.to_string())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extracts the `rel="next"` target of a `Link` header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == "rel=\"next\"") {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_link_present() {
        let header = "<https://api.github.com/search/repositories?q=mcp&page=2>; rel=\"next\", \
                      <https://api.github.com/search/repositories?q=mcp&page=9>; rel=\"last\"";
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/search/repositories?q=mcp&page=2")
        );
    }

    #[test]
    fn test_next_link_absent_on_last_page() {
        let header = "<https://api.github.com/x?page=1>; rel=\"prev\", \
                      <https://api.github.com/x?page=1>; rel=\"first\"";
        assert!(next_link(header).is_none());
        assert!(next_link("").is_none());
    }

    #[test]
    fn test_decode_wrapped_base64() {
        assert_eq!(decode_base64("IyBI\nZWxs\nbw==\n").unwrap(), "# Hello");
        assert!(decode_base64("!!!").is_err());
    }

    #[test]
    fn test_default_options_match_daily_run() {
        let options = GithubSearchOptions::default();
        assert_eq!(options.min_stars, 10);
        assert_eq!(options.min_forks, 10);
        assert_eq!(options.failure_pause, Duration::from_secs(60));
        assert!(options.fetch_readme);
    }

    #[test]
    fn test_new_rejects_unprintable_token() {
        let options = GithubSearchOptions {
            token: Some("bad\ntoken".to_string()),
            ..Default::default()
        };
        assert!(GithubSearch::new(options).is_err());
    }
}
