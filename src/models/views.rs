//! Read-only shapes returned by the API.

use serde::Serialize;

use super::{Collection, Post};

/// A post together with its neighbours in ascending-day order.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub prev: Option<PostLink>,
    pub next: Option<PostLink>,
}

/// Enough of a post to render a prev/next link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostLink {
    pub id: String,
    pub day: i64,
    pub title: String,
}

impl From<&Post> for PostLink {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            day: post.day,
            title: post.title.clone(),
        }
    }
}

/// A tag and how many posts carry it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Headline numbers for the listing page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    pub streak: i64,
    pub total_posts: usize,
}

/// One row of the admin edit list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditListItem {
    pub id: String,
    pub day: i64,
    pub title: String,
    pub difficulty: String,
    pub difficulty_label: String,
}

impl From<&Post> for EditListItem {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            day: post.day,
            title: post.title.clone(),
            difficulty: post.difficulty.clone(),
            difficulty_label: post.difficulty_label().to_string(),
        }
    }
}

/// What the admin page needs to offer a draft for restoration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub post_count: usize,
    pub last_updated: String,
}

impl From<&Collection> for DraftSummary {
    fn from(collection: &Collection) -> Self {
        Self {
            post_count: collection.posts.len(),
            last_updated: collection.meta.last_updated.clone(),
        }
    }
}

/// Output of the generate action: the document and its published text.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOutput {
    pub collection: Collection,
    pub preview: String,
}

/// Result of a successful publish.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub screenshot_uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_sha: Option<String>,
    pub total_posts: usize,
}
