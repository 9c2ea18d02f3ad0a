//! GitHub contents API client and the locally stored connection settings.
//!
//! Updating an existing file requires its current content hash, so writes go
//! through a probe first. No hash means the file is created.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;

use crate::db::{LocalStorage, GITHUB_CONFIG_KEY};
use crate::errors::AppError;
use crate::models::{ContentsFile, GithubConfig, PutContentsRequest, PutContentsResponse};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Build the HTTP client shared by the post store and the contents API.
pub fn http_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// A create-or-update request the remote refused or never answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub status: Option<u16>,
    pub body: String,
}

impl WriteFailure {
    /// Turn into a publish error prefixed with what was being written.
    pub fn into_publish_error(self, what: &str) -> AppError {
        let message = match self.status {
            Some(status) => format!("{} ({}): {}", what, status, self.body),
            None => format!("{}: {}", what, self.body),
        };
        AppError::Publish {
            status: self.status,
            message,
        }
    }
}

/// Thin client over `/repos/{owner}/{repo}/contents/{path}`.
#[derive(Clone)]
pub struct ContentsClient {
    http: reqwest::Client,
    api_base: String,
}

impl ContentsClient {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Contents URL for `path`, with every path segment percent-encoded.
    fn file_url(&self, config: &GithubConfig, path: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| AppError::Config(format!("Invalid GitHub API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config("GitHub API URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["repos", config.owner.as_str(), config.repo.as_str(), "contents"])
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    fn headers(config: &GithubConfig) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| AppError::Config("GitHub token contains invalid characters.".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        Ok(headers)
    }

    /// Current content hash of `path`, or `None` when the file does not exist.
    ///
    /// Any non-success answer counts as "does not exist"; only transport
    /// failures are errors.
    pub async fn probe_sha(
        &self,
        config: &GithubConfig,
        path: &str,
    ) -> Result<Option<String>, AppError> {
        let response = self
            .http
            .get(self.file_url(config, path)?)
            .headers(Self::headers(config)?)
            .send()
            .await
            .map_err(|e| AppError::Publish {
                status: None,
                message: format!("Could not check {}: {}", path, e),
            })?;

        if !response.status().is_success() {
            tracing::debug!("{} not found remotely ({})", path, response.status());
            return Ok(None);
        }

        let file: ContentsFile = response.json().await.map_err(|e| AppError::Publish {
            status: None,
            message: format!("Unexpected response checking {}: {}", path, e),
        })?;
        Ok(Some(file.sha))
    }

    /// Create or update `path` with `content`.
    ///
    /// Pass the probed hash as `sha` to update; `None` creates. Returns the
    /// new content hash when the remote reports one.
    pub async fn put_file(
        &self,
        config: &GithubConfig,
        path: &str,
        message: &str,
        content: &[u8],
        sha: Option<String>,
    ) -> Result<Option<String>, WriteFailure> {
        let body = PutContentsRequest {
            message: message.to_string(),
            content: STANDARD.encode(content),
            sha,
        };

        let (url, headers) = self
            .file_url(config, path)
            .and_then(|url| Ok((url, Self::headers(config)?)))
            .map_err(|e| WriteFailure {
                status: None,
                body: e.message(),
            })?;

        let response = self
            .http
            .put(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| WriteFailure {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WriteFailure {
                status: Some(status.as_u16()),
                body: text,
            });
        }

        let written: PutContentsResponse = response.json().await.unwrap_or(PutContentsResponse {
            content: None,
        });
        tracing::info!("Committed {} ({})", path, status);
        Ok(written.content.map(|c| c.sha))
    }
}

/// GitHub settings persisted in local storage.
#[derive(Clone)]
pub struct GithubSettings {
    storage: LocalStorage,
}

impl GithubSettings {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Stored settings; empty when none were saved or they are unreadable.
    pub async fn load(&self) -> GithubConfig {
        match self.storage.get_json::<GithubConfig>(GITHUB_CONFIG_KEY).await {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable GitHub config: {}", e);
                GithubConfig::default()
            }
        }
    }

    /// Save complete settings. Incomplete settings are refused.
    pub async fn save(&self, config: &GithubConfig) -> Result<GithubConfig, AppError> {
        let config = config.trimmed();
        if !config.is_complete() {
            return Err(AppError::Validation(vec![
                "Please fill in all GitHub fields.".to_string(),
            ]));
        }

        self.storage.set_json(GITHUB_CONFIG_KEY, &config).await?;
        tracing::info!("GitHub config saved for {}/{}", config.owner, config.repo);
        Ok(config)
    }
}
