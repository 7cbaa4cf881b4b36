//! Tweet record validation and normalization.
//!
//! Turns untyped JSON (`serde_json::Value`) into validated [`Tweet`] records.
//! Checks run in a fixed order and stop at the first violation:
//!
//! 1. `text`
//! 2. `author` (`username`, `name`, `profile_image_url`)
//! 3. `created_at`
//! 4. `metrics` (`like_count`, `reply_count`, `retweet_count`)
//!
//! Also understands the X API v2 search envelope, where tweets live under
//! `data` and their authors are expanded under `includes.users`.

use crate::date_parser::{NaiveTimestampPolicy, parse_timestamp};
use crate::error::{FieldPath, TweetshapeError, ValidationError};
use crate::model::{Author, Metrics, Tweet};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, trace};
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// What to do with a username written as `@handle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UsernamePolicy {
    /// Drop a single leading `@`.
    #[default]
    Strip,
    /// Refuse the value as the wrong kind of string.
    Reject,
}

/// Knobs for the policies the input contract leaves open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub username_policy: UsernamePolicy,
    pub naive_timestamps: NaiveTimestampPolicy,
    /// Only accept `https` profile image URLs.
    pub require_https_images: bool,
}

/// Validate a single tweet with the default options.
///
/// # Errors
/// Returns the first violation found, with the path of the offending field.
pub fn parse_tweet(input: &Value) -> Result<Tweet, ValidationError> {
    parse_tweet_with(input, &ValidationOptions::default())
}

/// Validate a single tweet.
///
/// # Errors
/// Returns the first violation found, with the path of the offending field.
pub fn parse_tweet_with(
    input: &Value,
    options: &ValidationOptions,
) -> Result<Tweet, ValidationError> {
    parse_tweet_at(input, options, &FieldPath::root())
}

/// Decode JSON text and validate it as a single tweet.
///
/// # Errors
/// Returns [`TweetshapeError::Json`] for malformed JSON and
/// [`TweetshapeError::Validation`] for a well-formed but invalid record.
pub fn parse_tweet_str(json: &str, options: &ValidationOptions) -> crate::Result<Tweet> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| TweetshapeError::json(e, None))?;
    Ok(parse_tweet_with(&value, options)?)
}

/// Validate a batch of tweets independently.
///
/// Results come back in input order. Error paths are prefixed with the
/// element index, e.g. `[3].metrics.like_count`.
#[must_use]
pub fn parse_tweets(
    inputs: &[Value],
    options: &ValidationOptions,
) -> Vec<Result<Tweet, ValidationError>> {
    debug!(count = inputs.len(), "Validating tweet batch");
    let root = FieldPath::root();
    inputs
        .par_iter()
        .enumerate()
        .map(|(idx, input)| parse_tweet_at(input, options, &root.index(idx)))
        .collect()
}

/// Validate every tweet in an X API v2 search response.
///
/// Fails on the first invalid tweet. A body without `data` is an empty result.
///
/// # Errors
/// Returns the first violation, with paths like `data[2].metrics.like_count`.
pub fn parse_search_response(
    body: &Value,
    options: &ValidationOptions,
) -> Result<Vec<Tweet>, ValidationError> {
    validate_search_response(body, options)?
        .into_iter()
        .collect()
}

/// Validate an X API v2 search response, keeping one result per tweet.
///
/// The outer error covers the envelope itself (`data` or `includes.users`
/// of the wrong shape); the inner results are per tweet, in `data` order.
///
/// # Errors
/// Returns an error when the envelope structure is invalid.
pub fn validate_search_response(
    body: &Value,
    options: &ValidationOptions,
) -> Result<Vec<Result<Tweet, ValidationError>>, ValidationError> {
    let root = FieldPath::root();
    let envelope = expect_object(body, &root)?;

    let Some(data) = envelope.get("data") else {
        debug!("Search response has no data; treating as empty");
        return Ok(Vec::new());
    };
    let data_path = root.key("data");
    let Value::Array(items) = data else {
        return Err(wrong_type(&data_path, "an array", data));
    };

    let users = index_users(envelope, &root)?;
    debug!(
        tweets = items.len(),
        users = users.len(),
        "Validating search response"
    );

    Ok(items
        .par_iter()
        .enumerate()
        .map(|(idx, item)| {
            let flat = flatten_api_tweet(item, &users);
            parse_tweet_at(&flat, options, &data_path.index(idx))
        })
        .collect())
}

/// Build the flat tweet shape from an API v2 tweet and the expanded users.
///
/// `public_metrics` becomes `metrics` and `author_id` is replaced by the
/// matching user object. Keys that cannot be resolved are left out so the
/// validator reports them as missing in its usual order.
#[must_use]
pub fn flatten_api_tweet(tweet: &Value, users: &HashMap<&str, &Value>) -> Value {
    let Value::Object(fields) = tweet else {
        return tweet.clone();
    };

    let mut flat = Map::new();
    if let Some(text) = fields.get("text") {
        flat.insert("text".to_string(), text.clone());
    }
    if let Some(author) = fields
        .get("author_id")
        .and_then(Value::as_str)
        .and_then(|id| users.get(id))
    {
        flat.insert("author".to_string(), (*author).clone());
    }
    if let Some(created_at) = fields.get("created_at") {
        flat.insert("created_at".to_string(), created_at.clone());
    }
    if let Some(metrics) = fields.get("public_metrics") {
        flat.insert("metrics".to_string(), metrics.clone());
    }
    Value::Object(flat)
}

fn index_users<'a>(
    envelope: &'a Map<String, Value>,
    root: &FieldPath,
) -> Result<HashMap<&'a str, &'a Value>, ValidationError> {
    let mut users = HashMap::new();
    let Some(includes) = envelope.get("includes") else {
        return Ok(users);
    };
    let includes_path = root.key("includes");
    let includes = expect_object(includes, &includes_path)?;
    let Some(list) = includes.get("users") else {
        return Ok(users);
    };
    let users_path = includes_path.key("users");
    let Value::Array(list) = list else {
        return Err(wrong_type(&users_path, "an array", list));
    };

    for (idx, user) in list.iter().enumerate() {
        let user_path = users_path.index(idx);
        let fields = expect_object(user, &user_path)?;
        let (id, id_path) = require(fields, "id", &user_path)?;
        users.insert(expect_str(id, &id_path)?, user);
    }
    Ok(users)
}

// =============================================================================
// Record validators
// =============================================================================

pub(crate) fn parse_tweet_at(
    input: &Value,
    options: &ValidationOptions,
    path: &FieldPath,
) -> Result<Tweet, ValidationError> {
    let fields = expect_object(input, path)?;

    let (text, text_path) = require(fields, "text", path)?;
    let text = required_text(text, &text_path)?;

    let (author, author_path) = require(fields, "author", path)?;
    let author = parse_author_at(author, options, &author_path)?;

    let (created_at, created_at_path) = require(fields, "created_at", path)?;
    let created_at = parse_created_at(created_at, options, &created_at_path)?;

    let (metrics, metrics_path) = require(fields, "metrics", path)?;
    let metrics = parse_metrics_at(metrics, &metrics_path)?;

    trace!(path = %path, username = author.username(), "Validated tweet");
    Ok(Tweet::new(text, author, created_at, metrics))
}

pub(crate) fn parse_author_at(
    input: &Value,
    options: &ValidationOptions,
    path: &FieldPath,
) -> Result<Author, ValidationError> {
    let fields = expect_object(input, path)?;

    let (username, username_path) = require(fields, "username", path)?;
    let username = parse_username(username, options.username_policy, &username_path)?;

    let (name, name_path) = require(fields, "name", path)?;
    let name = normalize_text(expect_str(name, &name_path)?);

    let (url, url_path) = require(fields, "profile_image_url", path)?;
    let url = parse_image_url(url, options.require_https_images, &url_path)?;

    Ok(Author::new(username, name, url))
}

pub(crate) fn parse_metrics_at(input: &Value, path: &FieldPath) -> Result<Metrics, ValidationError> {
    let fields = expect_object(input, path)?;

    let (likes, likes_path) = require(fields, "like_count", path)?;
    let like_count = parse_count(likes, &likes_path)?;

    let (replies, replies_path) = require(fields, "reply_count", path)?;
    let reply_count = parse_count(replies, &replies_path)?;

    let (retweets, retweets_path) = require(fields, "retweet_count", path)?;
    let retweet_count = parse_count(retweets, &retweets_path)?;

    Ok(Metrics::new(like_count, reply_count, retweet_count))
}

// =============================================================================
// Field validators
// =============================================================================

fn required_text(value: &Value, path: &FieldPath) -> Result<String, ValidationError> {
    let text = normalize_text(expect_str(value, path)?);
    if text.is_empty() {
        return Err(ValidationError::out_of_range(
            path,
            "must not be empty after trimming",
        ));
    }
    Ok(text)
}

fn parse_username(
    value: &Value,
    policy: UsernamePolicy,
    path: &FieldPath,
) -> Result<String, ValidationError> {
    let raw = expect_str(value, path)?.trim();

    let handle = match (raw.strip_prefix('@'), policy) {
        (Some(stripped), UsernamePolicy::Strip) => stripped,
        (Some(_), UsernamePolicy::Reject) => {
            return Err(ValidationError::wrong_type(
                path,
                format!("expected a bare handle, found '{raw}'"),
            ));
        }
        (None, _) => raw,
    };

    if handle.is_empty() {
        return Err(ValidationError::out_of_range(
            path,
            "must not be empty after trimming",
        ));
    }
    if let Some(bad) = handle.chars().find(|c| !is_handle_char(*c)) {
        return Err(ValidationError::unparseable(
            path,
            format!("'{handle}' is not a valid handle (unexpected {bad:?})"),
        ));
    }
    Ok(handle.to_string())
}

const fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_image_url(
    value: &Value,
    require_https: bool,
    path: &FieldPath,
) -> Result<Url, ValidationError> {
    let raw = expect_str(value, path)?.trim();
    let url = Url::parse(raw)
        .map_err(|e| ValidationError::unparseable(path, format!("'{raw}' is not a URL: {e}")))?;

    match url.scheme() {
        "https" => {}
        "http" if !require_https => {}
        scheme => {
            return Err(ValidationError::unparseable(
                path,
                format!("unsupported URL scheme '{scheme}'"),
            ));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::unparseable(
            path,
            format!("'{raw}' has no host"),
        ));
    }
    Ok(url)
}

fn parse_created_at(
    value: &Value,
    options: &ValidationOptions,
    path: &FieldPath,
) -> Result<DateTime<Utc>, ValidationError> {
    let raw = expect_str(value, path)?;
    parse_timestamp(raw, options.naive_timestamps)
        .map_err(|e| ValidationError::unparseable(path, e.to_string()))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn parse_count(value: &Value, path: &FieldPath) -> Result<u64, ValidationError> {
    let Value::Number(number) = value else {
        return Err(wrong_type(path, "a non-negative integer", value));
    };

    if let Some(count) = number.as_u64() {
        return Ok(count);
    }
    if let Some(negative) = number.as_i64() {
        return Err(ValidationError::out_of_range(
            path,
            format!("count must be non-negative, got {negative}"),
        ));
    }

    // Floats: accept whole numbers such as `3.0`.
    let float = number.as_f64().unwrap_or(f64::NAN);
    if !float.is_finite() || float.fract() != 0.0 {
        return Err(ValidationError::wrong_type(
            path,
            format!("expected an integral count, found {number}"),
        ));
    }
    if float < 0.0 {
        return Err(ValidationError::out_of_range(
            path,
            format!("count must be non-negative, got {number}"),
        ));
    }
    if float >= u64::MAX as f64 {
        return Err(ValidationError::out_of_range(
            path,
            format!("count {number} does not fit in 64 bits"),
        ));
    }
    Ok(float as u64)
}

// =============================================================================
// Helpers
// =============================================================================

/// Trim and NFC-normalize.
fn normalize_text(raw: &str) -> String {
    raw.trim().nfc().collect()
}

fn require<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    parent: &FieldPath,
) -> Result<(&'a Value, FieldPath), ValidationError> {
    let path = parent.key(key);
    match fields.get(key) {
        Some(value) => Ok((value, path)),
        None => Err(ValidationError::missing(&path)),
    }
}

fn expect_object<'a>(
    value: &'a Value,
    path: &FieldPath,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(path, "an object", value))
}

fn expect_str<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| wrong_type(path, "a string", value))
}

fn wrong_type(path: &FieldPath, expected: &str, found: &Value) -> ValidationError {
    ValidationError::wrong_type(
        path,
        format!("expected {expected}, found {}", json_kind(found)),
    )
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
