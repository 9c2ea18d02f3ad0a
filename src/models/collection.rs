//! The published document: every post plus summary metadata.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Post;

/// Schema version written into `meta.version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Summary metadata stored alongside the posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    pub version: i32,
    pub last_updated: String,
    pub total_posts: usize,
}

impl Default for CollectionMeta {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            last_updated: today_iso(),
            total_posts: 0,
        }
    }
}

/// The root document persisted remotely and as the local draft.
///
/// Posts are stored ascending by `day`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    #[serde(default)]
    pub meta: CollectionMeta,
    pub posts: Vec<Post>,
}

impl Collection {
    /// Wrap posts in a fresh document stamped with today's date.
    pub fn new(posts: Vec<Post>) -> Self {
        let posts = sorted_asc(&posts);
        Self {
            meta: CollectionMeta {
                version: SCHEMA_VERSION,
                last_updated: today_iso(),
                total_posts: posts.len(),
            },
            posts,
        }
    }

    /// Pretty-printed JSON, the exact bytes that get published.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Copy of `posts` ordered by ascending day.
pub fn sorted_asc(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| a.day.cmp(&b.day));
    sorted
}

/// Copy of `posts` ordered newest first.
pub fn sorted_desc(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.day.cmp(&a.day));
    sorted
}

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, day: i64) -> Post {
        Post {
            id: id.to_string(),
            day,
            date: "2026-01-01".to_string(),
            title: format!("Day {}", day),
            screenshot: None,
            time_spent: None,
            difficulty: "medium".to_string(),
            tags: vec![],
            what_i_built: "built".to_string(),
            how_it_went: "went".to_string(),
            what_i_learned: "learned".to_string(),
            biggest_challenge: "challenge".to_string(),
            link: None,
        }
    }

    #[test]
    fn test_sorting_is_a_pure_reordering() {
        let posts = vec![post("b", 3), post("a", 1), post("c", 7), post("d", 2)];

        let desc = sorted_desc(&posts);
        let asc = sorted_asc(&posts);

        assert_eq!(sorted_asc(&desc), asc);
        assert_eq!(
            desc.iter().map(|p| p.day).collect::<Vec<_>>(),
            vec![7, 3, 2, 1]
        );
        // Input left untouched
        assert_eq!(posts[0].id, "b");
    }

    #[test]
    fn test_new_collection_meta() {
        let collection = Collection::new(vec![post("b", 2), post("a", 1)]);

        assert_eq!(collection.meta.version, 1);
        assert_eq!(collection.meta.total_posts, 2);
        assert_eq!(collection.meta.last_updated, today_iso());
        assert_eq!(collection.posts[0].id, "a");
    }

    #[test]
    fn test_pretty_json_shape() {
        let collection = Collection::new(vec![post("day-001", 1)]);
        let json = collection.to_pretty_json().unwrap();

        assert!(json.contains("\n  \"meta\""));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["meta"]["totalPosts"], 1);
        assert_eq!(value["posts"][0]["id"], "day-001");
    }

    #[test]
    fn test_document_without_posts_is_rejected() {
        let result = serde_json::from_str::<Collection>(r#"{"meta":{"version":1}}"#);
        assert!(result.is_err());
    }
}
