//! GitHub connection settings and the contents API wire types.

use serde::{Deserialize, Serialize};

/// Credentials needed to publish, stored in local storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubConfig {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub token: String,
}

impl GithubConfig {
    /// True when owner, repo and token are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.owner.trim().is_empty()
            && !self.repo.trim().is_empty()
            && !self.token.trim().is_empty()
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            owner: self.owner.trim().to_string(),
            repo: self.repo.trim().to_string(),
            token: self.token.trim().to_string(),
        }
    }

    /// Public view that never carries the token itself.
    pub fn view(&self) -> GithubConfigView {
        let token_hint = if self.token.is_empty() {
            None
        } else {
            let chars: Vec<char> = self.token.chars().collect();
            let start = chars.len().saturating_sub(4);
            Some(chars[start..].iter().collect())
        };

        GithubConfigView {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            configured: self.is_complete(),
            token_hint,
        }
    }
}

/// GitHub settings as shown to the admin page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubConfigView {
    pub owner: String,
    pub repo: String,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_hint: Option<String>,
}

/// The part of a contents API file response we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsFile {
    pub sha: String,
}

/// Body of a create-or-update file request.
#[derive(Debug, Clone, Serialize)]
pub struct PutContentsRequest {
    pub message: String,
    /// Base64-encoded file content.
    pub content: String,
    /// Current content hash; absent when creating the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Response to a create-or-update file request.
#[derive(Debug, Clone, Deserialize)]
pub struct PutContentsResponse {
    #[serde(default)]
    pub content: Option<ContentsFile>,
}
