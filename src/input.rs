//! Input document detection.
//!
//! Files handed to the CLI come in a few shapes: one tweet object, an array
//! of tweet objects, an X API v2 search response, or JSON Lines. This module
//! tells them apart and runs the matching validator.

use crate::error::{Result, TweetshapeError, ValidationError};
use crate::model::Tweet;
use crate::parser::{self, ValidationOptions};
use serde_json::Value;
use tracing::debug;

/// A decoded input document.
#[derive(Debug, Clone, PartialEq)]
pub enum InputDocument {
    /// A single tweet object (or any non-array, non-envelope value).
    Single(Value),
    /// A JSON array of tweet objects.
    Array(Vec<Value>),
    /// An X API v2 search response body.
    Envelope(Value),
    /// JSON Lines: one tweet object per non-blank line.
    Lines(Vec<Value>),
}

impl InputDocument {
    /// Decode and classify input text.
    ///
    /// # Errors
    /// Returns [`TweetshapeError::Json`] when the text is neither a JSON
    /// document nor valid JSON Lines. For JSON Lines the error names the
    /// offending line.
    pub fn detect(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Ok(Self::Lines(Vec::new()));
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => Ok(Self::Array(items)),
            Ok(value) if is_envelope(&value) => Ok(Self::Envelope(value)),
            Ok(value) => Ok(Self::Single(value)),
            Err(err) if trimmed.starts_with('{') => {
                debug!(error = %err, "Not a single JSON document; trying JSON Lines");
                parse_lines(text)
            }
            Err(err) => Err(TweetshapeError::json(err, None)),
        }
    }

    /// Short name of the detected shape, for logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "object",
            Self::Array(_) => "array",
            Self::Envelope(_) => "search response",
            Self::Lines(_) => "json lines",
        }
    }

    /// Validate every record in the document, in document order.
    ///
    /// Envelope-level problems (for example `data` not being an array) come
    /// back as a single failed result.
    #[must_use]
    pub fn validate(
        &self,
        options: &ValidationOptions,
    ) -> Vec<std::result::Result<Tweet, ValidationError>> {
        match self {
            Self::Single(value) => vec![parser::parse_tweet_with(value, options)],
            Self::Array(items) | Self::Lines(items) => parser::parse_tweets(items, options),
            Self::Envelope(body) => parser::validate_search_response(body, options)
                .unwrap_or_else(|err| vec![Err(err)]),
        }
    }
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|fields| {
        fields.get("data").is_some_and(Value::is_array)
            || fields.contains_key("includes")
            || fields.contains_key("meta")
    })
}

fn parse_lines(text: &str) -> Result<InputDocument> {
    let mut items = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value =
            serde_json::from_str(line).map_err(|e| TweetshapeError::json(e, Some(idx + 1)))?;
        items.push(value);
    }
    Ok(InputDocument::Lines(items))
}
