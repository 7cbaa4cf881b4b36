//! Data models for validated tweet records.
//!
//! These structures are the normalized form of a tweet after it has passed
//! validation. Fields are private: a record is only produced by the validator
//! in [`crate::parser`], and deserializing one routes through the same
//! validation, so a value of these types always upholds its invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FieldPath, ValidationError};
use crate::parser::{self, ValidationOptions};

/// A single post with its author, creation time, and engagement counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Tweet {
    text: String,
    author: Author,
    created_at: DateTime<Utc>,
    metrics: Metrics,
}

/// The poster identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Author {
    username: String,
    name: String,
    profile_image_url: Url,
}

/// Engagement counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Metrics {
    like_count: u64,
    reply_count: u64,
    retweet_count: u64,
}

impl Tweet {
    pub(crate) const fn new(
        text: String,
        author: Author,
        created_at: DateTime<Utc>,
        metrics: Metrics,
    ) -> Self {
        Self {
            text,
            author,
            created_at,
            metrics,
        }
    }

    /// Trimmed, NFC-normalized post text. Never empty.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn author(&self) -> &Author {
        &self.author
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl Author {
    pub(crate) const fn new(username: String, name: String, profile_image_url: Url) -> Self {
        Self {
            username,
            name,
            profile_image_url,
        }
    }

    /// Handle without the `@` prefix.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Display name; may be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn profile_image_url(&self) -> &Url {
        &self.profile_image_url
    }
}

impl Metrics {
    #[must_use]
    pub const fn new(like_count: u64, reply_count: u64, retweet_count: u64) -> Self {
        Self {
            like_count,
            reply_count,
            retweet_count,
        }
    }

    #[must_use]
    pub const fn like_count(&self) -> u64 {
        self.like_count
    }

    #[must_use]
    pub const fn reply_count(&self) -> u64 {
        self.reply_count
    }

    #[must_use]
    pub const fn retweet_count(&self) -> u64 {
        self.retweet_count
    }
}

impl TryFrom<serde_json::Value> for Tweet {
    type Error = ValidationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        parser::parse_tweet(&value)
    }
}

impl TryFrom<serde_json::Value> for Author {
    type Error = ValidationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        parser::parse_author_at(&value, &ValidationOptions::default(), &FieldPath::root())
    }
}

impl TryFrom<serde_json::Value> for Metrics {
    type Error = ValidationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        parser::parse_metrics_at(&value, &FieldPath::root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "text": "hello",
            "author": {
                "username": "jdoe",
                "name": "J Doe",
                "profile_image_url": "https://x.com/a.png"
            },
            "created_at": "2024-01-01T00:00:00Z",
            "metrics": {"like_count": 3, "reply_count": 0, "retweet_count": 1}
        })
    }

    #[test]
    fn serializes_with_contract_keys() {
        let tweet: Tweet = serde_json::from_value(sample()).unwrap();
        let value = serde_json::to_value(&tweet).unwrap();
        assert_eq!(value["created_at"], "2024-01-01T00:00:00Z");
        assert_eq!(value["author"]["profile_image_url"], "https://x.com/a.png");
        assert_eq!(value["metrics"]["retweet_count"], 1);
    }

    #[test]
    fn deserialize_enforces_invariants() {
        let mut input = sample();
        input["metrics"]["like_count"] = json!(-1);
        let err = serde_json::from_value::<Tweet>(input).unwrap_err();
        assert!(err.to_string().contains("metrics.like_count"));
    }

    #[test]
    fn metrics_deserialize_directly() {
        let metrics: Metrics =
            serde_json::from_str(r#"{"like_count": 1, "reply_count": 2, "retweet_count": 3}"#)
                .unwrap();
        assert_eq!(metrics, Metrics::new(1, 2, 3));
    }

    #[test]
    fn author_deserialize_rejects_bad_url() {
        let err = serde_json::from_value::<Author>(json!({
            "username": "jdoe",
            "name": "",
            "profile_image_url": "not a url"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("profile_image_url: unparseable"));
    }
}
