//! The admin form: raw field values and their conversion to a candidate post.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Difficulty, Post, PRESET_TAGS};

/// Field values exactly as the admin page holds them.
///
/// Everything is text; `collect` does the trimming and parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PostForm {
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub day: String,
    pub date: String,
    pub title: String,
    pub screenshot: String,
    pub time_spent: String,
    /// The checked difficulty radio, if any.
    pub difficulty: Option<String>,
    /// Checked preset tag boxes.
    pub preset_tags: Vec<String>,
    /// Comma-separated free-text tags.
    pub custom_tags: String,
    #[serde(rename = "whatIBuilt")]
    pub what_i_built: String,
    pub how_it_went: String,
    #[serde(rename = "whatILearned")]
    pub what_i_learned: String,
    pub biggest_challenge: String,
    pub link: String,
}

impl PostForm {
    /// Fill every field from a stored post.
    pub fn from_post(post: &Post) -> Self {
        let preset_tags = post
            .tags
            .iter()
            .filter(|t| PRESET_TAGS.contains(&t.as_str()))
            .cloned()
            .collect();
        let custom_tags = post
            .tags
            .iter()
            .filter(|t| !PRESET_TAGS.contains(&t.as_str()))
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let difficulty = if post.difficulty.is_empty() {
            Difficulty::default().as_str().to_string()
        } else {
            post.difficulty.clone()
        };

        Self {
            id: post.id.clone(),
            day: post.day.to_string(),
            date: post.date.clone(),
            title: post.title.clone(),
            screenshot: post.screenshot.clone().unwrap_or_default(),
            time_spent: post.time_spent.clone().unwrap_or_default(),
            difficulty: Some(difficulty),
            preset_tags,
            custom_tags,
            what_i_built: post.what_i_built.clone(),
            how_it_went: post.how_it_went.clone(),
            what_i_learned: post.what_i_learned.clone(),
            biggest_challenge: post.biggest_challenge.clone(),
            link: post.link.clone().unwrap_or_default(),
        }
    }

    /// The day as entered, or `None` unless it reads as a positive integer.
    pub fn day_number(&self) -> Option<i64> {
        leading_integer(&self.day).filter(|d| *d > 0)
    }

    /// Read the fields into a candidate post. Nothing is validated here.
    pub fn collect(&self) -> Post {
        Post {
            id: self.id.trim().to_string(),
            day: leading_integer(&self.day).unwrap_or(0),
            date: self.date.trim().to_string(),
            title: self.title.trim().to_string(),
            screenshot: non_empty(&self.screenshot),
            time_spent: non_empty(&self.time_spent),
            difficulty: self
                .difficulty
                .as_deref()
                .unwrap_or(Difficulty::default().as_str())
                .trim()
                .to_string(),
            tags: merge_tags(&self.preset_tags, &self.custom_tags),
            what_i_built: self.what_i_built.trim().to_string(),
            how_it_went: self.how_it_went.trim().to_string(),
            what_i_learned: self.what_i_learned.trim().to_string(),
            biggest_challenge: self.biggest_challenge.trim().to_string(),
            link: non_empty(&self.link),
        }
    }
}

/// Checked presets in their fixed order, then free-text tags in entry order.
///
/// Matching is exact and case-sensitive: `"api"` and `"API"` are different
/// tags.
pub fn merge_tags(checked: &[String], custom: &str) -> Vec<String> {
    let mut tags: Vec<String> = PRESET_TAGS
        .iter()
        .filter(|preset| checked.iter().any(|c| c == *preset))
        .map(|preset| preset.to_string())
        .collect();

    for tag in custom.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// The integer at the start of `value`, ignoring whatever follows it:
/// `"3abc"` reads as 3 and `"1.5"` as 1.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let sign_len = usize::from(value.starts_with(['+', '-']));
    let digits_len = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    value[..sign_len + digits_len].parse().ok()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
