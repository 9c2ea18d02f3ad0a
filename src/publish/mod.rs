//! Publish workflow: commit the screenshot and the collection to GitHub.
//!
//! Steps run strictly in order and the first failure stops the rest. A
//! screenshot that was uploaded before the document write failed stays
//! uploaded.

use crate::errors::AppError;
use crate::github::ContentsClient;
use crate::models::{today_iso, Collection, GithubConfig, PublishReceipt};

/// Message used whenever publishing is attempted without credentials.
pub const CONFIG_INCOMPLETE: &str = "GitHub config incomplete. Please fill in the setup panel.";

/// Writes the published document (and screenshots) to the repository.
#[derive(Clone)]
pub struct Publisher {
    contents: ContentsClient,
    posts_path: String,
}

impl Publisher {
    pub fn new(contents: ContentsClient, posts_path: impl Into<String>) -> Self {
        Self {
            contents,
            posts_path: posts_path.into(),
        }
    }

    /// Publish `collection`, uploading `screenshot` to `screenshot_path`
    /// first when a file was attached.
    pub async fn publish(
        &self,
        config: &GithubConfig,
        collection: &Collection,
        screenshot: Option<&[u8]>,
        screenshot_path: &str,
    ) -> Result<PublishReceipt, AppError> {
        if !config.is_complete() {
            return Err(AppError::Config(CONFIG_INCOMPLETE.to_string()));
        }
        let config = config.trimmed();

        let mut screenshot_uploaded = false;
        let screenshot_path = screenshot_path.trim();
        if let Some(bytes) = screenshot.filter(|_| !screenshot_path.is_empty()) {
            let existing = self.contents.probe_sha(&config, screenshot_path).await?;
            tracing::info!(
                "Uploading screenshot {} ({} bytes, {})",
                screenshot_path,
                bytes.len(),
                if existing.is_some() { "update" } else { "create" }
            );
            self.contents
                .put_file(
                    &config,
                    screenshot_path,
                    &format!("Add screenshot: {}", screenshot_path),
                    bytes,
                    existing,
                )
                .await
                .map_err(|f| f.into_publish_error("Screenshot upload failed"))?;
            screenshot_uploaded = true;
        }

        let existing = self.contents.probe_sha(&config, &self.posts_path).await?;

        let json = collection
            .to_pretty_json()
            .map_err(|e| AppError::Internal(format!("Failed to serialize posts: {}", e)))?;

        let document_sha = self
            .contents
            .put_file(
                &config,
                &self.posts_path,
                &format!("Update posts via admin ({})", today_iso()),
                json.as_bytes(),
                existing,
            )
            .await
            .map_err(|f| f.into_publish_error(&format!("{} commit failed", self.posts_path)))?;

        tracing::info!(
            "Published {} posts to {}/{}",
            collection.posts.len(),
            config.owner,
            config.repo
        );

        Ok(PublishReceipt {
            screenshot_uploaded,
            document_sha,
            total_posts: collection.posts.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::http_client;
    use crate::test_support::{sample_post, MockRemote};

    fn config() -> GithubConfig {
        GithubConfig {
            owner: "octo".to_string(),
            repo: "journal".to_string(),
            token: "ghp_test".to_string(),
        }
    }

    fn publisher(remote: &MockRemote) -> Publisher {
        Publisher::new(
            ContentsClient::new(http_client().unwrap(), &remote.base_url),
            "posts.json",
        )
    }

    #[tokio::test]
    async fn test_incomplete_config_makes_no_requests() {
        let remote = MockRemote::start().await;
        let collection = Collection::new(vec![sample_post(1)]);
        let config = GithubConfig {
            repo: String::new(),
            ..config()
        };

        let err = publisher(&remote)
            .publish(&config, &collection, Some(b"png".as_slice()), "screenshots/a.png")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(remote.request_count(), 0);
    }

    #[tokio::test]
    async fn test_new_screenshot_is_created_without_hash() {
        let remote = MockRemote::start().await;
        remote.expect_token("ghp_test");
        let collection = Collection::new(vec![sample_post(1)]);

        let receipt = publisher(&remote)
            .publish(&config(), &collection, Some(b"png-bytes".as_slice()), "screenshots/day-001.png")
            .await
            .unwrap();

        assert!(receipt.screenshot_uploaded);
        let writes = remote.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].path, "screenshots/day-001.png");
        assert_eq!(writes[0].sha, None);
        assert_eq!(writes[0].message, "Add screenshot: screenshots/day-001.png");
        assert_eq!(writes[0].content, b"png-bytes");
        assert_eq!(writes[1].path, "posts.json");
        assert!(writes[1].message.starts_with("Update posts via admin ("));
    }

    #[tokio::test]
    async fn test_existing_screenshot_is_updated_with_probed_hash() {
        let remote = MockRemote::start().await;
        let screenshot_sha = remote.seed_file("screenshots/day-001.png", b"old");
        let posts_sha = remote.seed_posts(&Collection::new(vec![]));
        let collection = Collection::new(vec![sample_post(1)]);

        publisher(&remote)
            .publish(&config(), &collection, Some(b"new".as_slice()), "screenshots/day-001.png")
            .await
            .unwrap();

        let writes = remote.writes();
        assert_eq!(writes[0].sha, Some(screenshot_sha));
        assert_eq!(writes[1].sha, Some(posts_sha));
        assert_eq!(remote.file("screenshots/day-001.png").unwrap().content, b"new");
        assert_eq!(remote.published().unwrap(), collection);
    }

    #[tokio::test]
    async fn test_no_screenshot_skips_upload() {
        let remote = MockRemote::start().await;
        let collection = Collection::new(vec![sample_post(1)]);

        let receipt = publisher(&remote)
            .publish(&config(), &collection, None, "screenshots/day-001.png")
            .await
            .unwrap();

        assert!(!receipt.screenshot_uploaded);
        assert_eq!(remote.probes(), vec!["posts.json".to_string()]);
        assert_eq!(remote.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_screenshot_failure_stops_before_document() {
        let remote = MockRemote::start().await;
        remote.reject_writes_to("screenshots/day-001.png", 422);
        let collection = Collection::new(vec![sample_post(1)]);

        let err = publisher(&remote)
            .publish(&config(), &collection, Some(b"png".as_slice()), "screenshots/day-001.png")
            .await
            .unwrap_err();

        match err {
            AppError::Publish { status, message } => {
                assert_eq!(status, Some(422));
                assert_eq!(message, "Screenshot upload failed (422): rejected by test");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(remote.writes().len(), 1);
        assert!(remote.published().is_none());
    }

    #[tokio::test]
    async fn test_document_failure_keeps_uploaded_screenshot() {
        let remote = MockRemote::start().await;
        remote.reject_writes_to("posts.json", 500);
        let collection = Collection::new(vec![sample_post(1)]);

        let err = publisher(&remote)
            .publish(&config(), &collection, Some(b"png".as_slice()), "screenshots/day-001.png")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Publish { status: Some(500), ref message } if message.starts_with("posts.json commit failed (500)")
        ));
        assert!(remote.file("screenshots/day-001.png").is_some());
    }
}
