//! Post model matching the published `posts.json` entries.

use serde::{Deserialize, Serialize};

/// Preset tags offered as checkboxes, in display order.
pub const PRESET_TAGS: [&str; 8] = [
    "Web App",
    "CLI Tool",
    "Automation",
    "Game",
    "API",
    "Utility",
    "Data",
    "AI/ML",
];

/// How hard a day's build turned out to be.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Legendary,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Legendary => "legendary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Legendary => "Legendary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

/// One journal entry.
///
/// `difficulty` is kept as the raw string so that a candidate collected from
/// the form can be validated (and rejected) before it is trusted as a
/// [`Difficulty`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub day: i64,
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<String>,
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "whatIBuilt")]
    pub what_i_built: String,
    pub how_it_went: String,
    #[serde(rename = "whatILearned")]
    pub what_i_learned: String,
    pub biggest_challenge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Post {
    /// The recognized difficulty, if the stored string is one.
    pub fn difficulty(&self) -> Option<Difficulty> {
        Difficulty::from_str(&self.difficulty)
    }

    /// Display label for the difficulty, falling back to the raw value.
    pub fn difficulty_label(&self) -> &str {
        self.difficulty()
            .map(|d| d.label())
            .unwrap_or(self.difficulty.as_str())
    }
}

/// Zero-pad a day number to three digits: `3` becomes `"003"`.
pub fn pad_day(day: i64) -> String {
    format!("{:03}", day)
}

/// Canonical post id for a day number.
pub fn derive_id(day: i64) -> String {
    format!("day-{}", pad_day(day))
}

/// Default screenshot path for a day number.
pub fn default_screenshot_path(day: i64) -> String {
    format!("screenshots/day-{}.png", pad_day(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_and_derive() {
        assert_eq!(pad_day(3), "003");
        assert_eq!(pad_day(120), "120");
        assert_eq!(pad_day(1234), "1234");
        assert_eq!(derive_id(7), "day-007");
        assert_eq!(default_screenshot_path(42), "screenshots/day-042.png");
    }

    #[test]
    fn test_difficulty_round_trip_names() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_str("Medium"), None);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_post_wire_names() {
        let json = serde_json::json!({
            "id": "day-001",
            "day": 1,
            "date": "2026-02-21",
            "title": "First build",
            "timeSpent": "2h",
            "difficulty": "hard",
            "tags": ["API"],
            "whatIBuilt": "a thing",
            "howItWent": "well",
            "whatILearned": "lots",
            "biggestChallenge": "time"
        });

        let post: Post = serde_json::from_value(json).unwrap();
        assert_eq!(post.time_spent.as_deref(), Some("2h"));
        assert_eq!(post.what_i_built, "a thing");
        assert_eq!(post.difficulty(), Some(Difficulty::Hard));
        assert_eq!(post.difficulty_label(), "Hard");
        assert!(post.screenshot.is_none());

        let back = serde_json::to_value(&post).unwrap();
        assert_eq!(back["whatILearned"], "lots");
        assert_eq!(back["biggestChallenge"], "time");
        assert!(back.get("link").is_none());
    }

    #[test]
    fn test_post_missing_required_field_is_rejected() {
        let json = serde_json::json!({
            "id": "day-001",
            "day": 1,
            "date": "2026-02-21",
            "title": "No narrative",
            "difficulty": "easy"
        });

        assert!(serde_json::from_value::<Post>(json).is_err());
    }
}
