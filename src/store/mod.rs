//! Post store: the read-side cache of the published `posts.json`.
//!
//! The first `fetch_all` issues the remote read. Callers arriving while it is
//! in flight wait on the same read, and once it succeeds every later call is
//! served from memory until `clear_cache`. A failed read leaves the store
//! empty so the next call starts over.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::errors::AppError;
use crate::models::{sorted_asc, sorted_desc, Collection, JournalStats, Post, PostDetail, PostLink, TagCount};

type LoadResult = Result<Arc<Vec<Post>>, AppError>;

enum CacheState {
    Empty,
    Loading {
        generation: u64,
        cell: Arc<OnceCell<LoadResult>>,
    },
    Ready(Arc<Vec<Post>>),
}

struct CacheInner {
    generation: u64,
    state: CacheState,
}

/// Fetches and caches the published posts, newest first.
pub struct PostStore {
    http: reqwest::Client,
    source_url: String,
    inner: Mutex<CacheInner>,
}

impl PostStore {
    pub fn new(http: reqwest::Client, source_url: impl Into<String>) -> Self {
        Self {
            http,
            source_url: source_url.into(),
            inner: Mutex::new(CacheInner {
                generation: 0,
                state: CacheState::Empty,
            }),
        }
    }

    /// All posts, descending by day.
    pub async fn fetch_all(&self) -> Result<Arc<Vec<Post>>, AppError> {
        let (generation, cell) = {
            let mut inner = self.inner.lock().await;
            let in_flight = match &inner.state {
                CacheState::Ready(posts) => return Ok(Arc::clone(posts)),
                CacheState::Loading { generation, cell } => Some((*generation, Arc::clone(cell))),
                CacheState::Empty => None,
            };

            match in_flight {
                Some(load) => load,
                None => {
                    inner.generation += 1;
                    let generation = inner.generation;
                    let cell = Arc::new(OnceCell::new());
                    inner.state = CacheState::Loading {
                        generation,
                        cell: Arc::clone(&cell),
                    };
                    (generation, cell)
                }
            }
        };

        let result = cell
            .get_or_init(|| read_posts(&self.http, &self.source_url))
            .await
            .clone();

        let mut inner = self.inner.lock().await;
        let still_current = matches!(
            inner.state,
            CacheState::Loading { generation: current, .. } if current == generation
        );
        if still_current {
            inner.state = match &result {
                Ok(posts) => CacheState::Ready(Arc::clone(posts)),
                Err(_) => CacheState::Empty,
            };
        }

        result
    }

    /// The post whose id matches `id`.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Post>, AppError> {
        let posts = self.fetch_all().await?;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    /// Every distinct tag, in ascending lexical order.
    pub async fn get_all_tags(&self) -> Result<Vec<String>, AppError> {
        let posts = self.fetch_all().await?;
        let tags: BTreeSet<&String> = posts.iter().flat_map(|p| p.tags.iter()).collect();
        Ok(tags.into_iter().cloned().collect())
    }

    /// All posts, ascending by day.
    pub async fn get_all_sorted_asc(&self) -> Result<Vec<Post>, AppError> {
        let posts = self.fetch_all().await?;
        Ok(sorted_asc(&posts))
    }

    /// Drop cached data and any in-flight read.
    pub async fn clear_cache(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.state = CacheState::Empty;
        tracing::debug!("Post cache cleared");
    }

    /// Posts carrying any of `tags`, newest first. No tags means every post.
    pub async fn filter_by_tags(&self, tags: &[String]) -> Result<Vec<Post>, AppError> {
        let posts = self.fetch_all().await?;
        if tags.is_empty() {
            return Ok(posts.as_ref().clone());
        }

        Ok(posts
            .iter()
            .filter(|p| p.tags.iter().any(|t| tags.contains(t)))
            .cloned()
            .collect())
    }

    /// Each tag with the number of posts carrying it.
    pub async fn tag_counts(&self) -> Result<Vec<TagCount>, AppError> {
        let posts = self.fetch_all().await?;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for tag in posts.iter().flat_map(|p| p.tags.iter()) {
            *counts.entry(tag.as_str()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect())
    }

    /// A post with its previous and next neighbours by day.
    pub async fn get_detail(&self, id: &str) -> Result<Option<PostDetail>, AppError> {
        let Some(post) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let posts = self.get_all_sorted_asc().await?;
        let index = posts.iter().position(|p| p.id == post.id).unwrap_or_default();
        let prev = index
            .checked_sub(1)
            .and_then(|i| posts.get(i))
            .map(PostLink::from);
        let next = posts.get(index + 1).map(PostLink::from);

        Ok(Some(PostDetail { post, prev, next }))
    }

    /// Highest day number published and the number of posts.
    pub async fn stats(&self) -> Result<JournalStats, AppError> {
        let posts = self.fetch_all().await?;
        Ok(JournalStats {
            streak: posts.iter().map(|p| p.day).max().unwrap_or(0),
            total_posts: posts.len(),
        })
    }
}

async fn read_posts(http: &reqwest::Client, url: &str) -> LoadResult {
    tracing::debug!("Reading published posts from {}", url);

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Load(format!("Could not load posts.json: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Load(format!(
            "HTTP {}: could not load posts.json",
            status.as_u16()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::Load(format!("Could not read posts.json: {}", e)))?;

    let collection: Collection = serde_json::from_slice(&body)
        .map_err(|e| AppError::Load(format!("posts.json is malformed: {}", e)))?;

    tracing::info!("Loaded {} published posts", collection.posts.len());
    Ok(Arc::new(sorted_desc(&collection.posts)))
}
