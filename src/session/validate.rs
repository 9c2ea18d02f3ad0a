//! Field checks for a candidate post.

use crate::models::{Difficulty, Post};

/// Every violation in `post`, in a fixed order. Empty means valid.
///
/// All checks run; nothing short-circuits.
pub fn validate_post(post: &Post) -> Vec<String> {
    let mut errors = Vec::new();

    if post.id.trim().is_empty() {
        errors.push("Post ID is missing.".to_string());
    }
    if post.day < 1 {
        errors.push("Day number must be a positive integer.".to_string());
    }
    if post.date.trim().is_empty() {
        errors.push("Date is required.".to_string());
    }
    if post.title.trim().is_empty() {
        errors.push("Title is required.".to_string());
    }
    if post.difficulty.trim().is_empty() {
        errors.push("Difficulty is required.".to_string());
    }
    if post.what_i_built.trim().is_empty() {
        errors.push("\"What I Built\" is required.".to_string());
    }
    if post.how_it_went.trim().is_empty() {
        errors.push("\"How It Went\" is required.".to_string());
    }
    if post.what_i_learned.trim().is_empty() {
        errors.push("\"What I Learned\" is required.".to_string());
    }
    if post.biggest_challenge.trim().is_empty() {
        errors.push("\"Biggest Challenge\" is required.".to_string());
    }
    if let Some(link) = post.link.as_deref().filter(|l| !l.is_empty()) {
        if !has_http_scheme(link) {
            errors.push("Link must start with http:// or https://".to_string());
        }
    }
    if Difficulty::from_str(&post.difficulty).is_none() {
        errors.push("Invalid difficulty value.".to_string());
    }

    errors
}

fn has_http_scheme(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_post;

    #[test]
    fn test_valid_post_has_no_violations() {
        assert!(validate_post(&sample_post(1)).is_empty());

        let mut no_link = sample_post(1);
        no_link.link = None;
        assert!(validate_post(&no_link).is_empty());

        let mut shouty = sample_post(1);
        shouty.link = Some("HTTPS://EXAMPLE.COM".to_string());
        assert!(validate_post(&shouty).is_empty());
    }

    #[test]
    fn test_each_missing_field_reports_once() {
        let mut post = sample_post(1);
        post.title = String::new();
        post.how_it_went = "  ".to_string();
        post.date = String::new();

        let errors = validate_post(&post);
        assert_eq!(
            errors,
            vec![
                "Date is required.",
                "Title is required.",
                "\"How It Went\" is required.",
            ]
        );
    }

    #[test]
    fn test_all_violations_in_order() {
        let post = Post {
            id: String::new(),
            day: 0,
            date: String::new(),
            title: String::new(),
            screenshot: None,
            time_spent: None,
            difficulty: "medium".to_string(),
            tags: vec![],
            what_i_built: String::new(),
            how_it_went: String::new(),
            what_i_learned: String::new(),
            biggest_challenge: String::new(),
            link: Some("ftp://files".to_string()),
        };

        let errors = validate_post(&post);
        assert_eq!(errors.len(), 9);
        assert_eq!(errors[0], "Post ID is missing.");
        assert_eq!(errors[1], "Day number must be a positive integer.");
        assert_eq!(errors[8], "Link must start with http:// or https://");
    }

    #[test]
    fn test_unknown_difficulty() {
        let mut post = sample_post(1);
        post.difficulty = "impossible".to_string();
        assert_eq!(validate_post(&post), vec!["Invalid difficulty value."]);

        post.difficulty = String::new();
        assert_eq!(
            validate_post(&post),
            vec!["Difficulty is required.", "Invalid difficulty value."]
        );
    }
}
