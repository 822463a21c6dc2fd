use crate::config::Config;
use crate::error::{AnalystError, Result};
use crate::models::{RepositoryMetadata, NO_DESCRIPTION, NO_README, UNKNOWN_DATE, UNKNOWN_LANGUAGE};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("repo-analyst/", env!("CARGO_PKG_VERSION"));

/// Owner and name of a repository, parsed from its web URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Owner login
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    /// Splits `https://<host>/<owner>/<repo>` into owner and repo
    ///
    /// Surrounding whitespace, trailing slashes and a trailing `.git` are
    /// ignored. Fewer than four `/`-delimited segments, or an empty owner or
    /// repo segment, is a malformed URL.
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_matches('/');
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() < 4 {
            return Err(AnalystError::MalformedUrl(url.trim().to_string()));
        }

        // Owner and repo are the last two segments; behind a scheme they must follow the host.
        let owner_at = parts.len() - 2;
        let first_path_segment = if parts[0].ends_with(':') { 3 } else { 0 };
        let owner = parts[owner_at];
        let repo = parts[owner_at + 1].trim_end_matches(".git");

        if owner_at < first_path_segment || owner.is_empty() || repo.is_empty() {
            return Err(AnalystError::MalformedUrl(url.trim().to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Repository payload as returned by `GET /repos/{owner}/{repo}`
#[derive(Debug, Deserialize)]
struct RawRepository {
    name: Option<String>,
    full_name: Option<String>,
    description: Option<String>,
    html_url: Option<String>,
    language: Option<String>,
    owner: Option<RawOwner>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: Option<String>,
}

/// Payload of `GET /repos/{owner}/{repo}/readme`
#[derive(Debug, Deserialize)]
struct RawReadme {
    #[serde(default)]
    content: String,
}

/// Thin client over the GitHub REST API
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    web_prefix: String,
    timeout: Duration,
}

impl GitHubClient {
    /// Builds a client from the process configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        if let Some(token) = &config.api_keys.github_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| AnalystError::Config(format!("Invalid GitHub token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| AnalystError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.github.api_base.trim_end_matches('/').to_string(),
            web_prefix: config.github.web_prefix.clone(),
            timeout: config.request_timeout(),
        })
    }

    /// Parses `repo_url` and fetches its metadata
    pub async fn get_repo_info(&self, repo_url: &str) -> Result<RepositoryMetadata> {
        let target = RepoRef::parse(repo_url)?;
        self.get_repository(&target).await
    }

    /// Fetches and normalizes repository metadata
    pub async fn get_repository(&self, target: &RepoRef) -> Result<RepositoryMetadata> {
        let url = format!("{}/repos/{}/{}", self.api_base, target.owner, target.repo);
        info!("Requesting GitHub API: {}", url);

        let response = self.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!("GitHub API answered {} for {}", status, target.full_name());
            return Err(AnalystError::UpstreamApi {
                status: status.as_u16(),
                body,
            });
        }

        let raw: RawRepository = serde_json::from_str(&body)?;
        Ok(self.normalize(target, raw))
    }

    /// Fetches the README as text, or `NO_README` when it cannot be read
    pub async fn get_readme(&self, target: &RepoRef) -> String {
        match self.try_get_readme(target).await {
            Ok(text) => text,
            Err(e) => {
                warn!("README unavailable for {}: {}", target.full_name(), e);
                NO_README.to_string()
            }
        }
    }

    async fn try_get_readme(&self, target: &RepoRef) -> Result<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, target.owner, target.repo);
        debug!("Requesting README: {}", url);

        let response = self.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AnalystError::UpstreamApi {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let readme: RawReadme = serde_json::from_str(&response.text().await?)?;
        decode_content(&readme.content)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).timeout(self.timeout)
    }

    fn normalize(&self, target: &RepoRef, raw: RawRepository) -> RepositoryMetadata {
        let owner = raw
            .owner
            .and_then(|o| o.login)
            .unwrap_or_else(|| target.owner.clone());

        RepositoryMetadata {
            name: raw.name.unwrap_or_else(|| target.repo.clone()),
            full_name: raw.full_name.unwrap_or_else(|| target.full_name()),
            description: non_empty(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            html_url: raw
                .html_url
                .unwrap_or_else(|| format!("{}{}", self.web_prefix, target.full_name())),
            language: non_empty(raw.language).unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            open_issues: raw.open_issues_count,
            created_at: date_only(raw.created_at),
            updated_at: date_only(raw.updated_at),
            owner,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keeps the `YYYY-MM-DD` prefix of a forge timestamp
fn date_only(timestamp: Option<String>) -> String {
    match non_empty(timestamp) {
        Some(ts) => ts.chars().take(10).collect(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Decodes the base64 `content` field; GitHub wraps it at 60 columns
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| AnalystError::Network(format!("README is not valid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AnalystError::Network(format!("README is not UTF-8: {}", e)))
}
