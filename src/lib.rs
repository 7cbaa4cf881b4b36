//! tweetshape - validation and normalization of tweet records
//!
//! Turns untyped JSON (as decoded from an API response or an export file)
//! into immutable, validated [`Tweet`] records, or a [`ValidationError`]
//! naming the first offending field.
//!
//! ```rust
//! use serde_json::json;
//!
//! let tweet = tweetshape::parse_tweet(&json!({
//!     "text": " hello ",
//!     "author": {
//!         "username": "jdoe",
//!         "name": "J Doe",
//!         "profile_image_url": "https://x.com/a.png"
//!     },
//!     "created_at": "2024-01-01T00:00:00Z",
//!     "metrics": {"like_count": 3, "reply_count": 0, "retweet_count": 1}
//! }))
//! .unwrap();
//!
//! assert_eq!(tweet.text(), "hello");
//! ```
//!
//! # Modules
//!
//! - [`parser`] - The validator: single records, batches, API v2 responses
//! - [`model`] - Validated record types
//! - [`error`] - Validation errors with field paths, crate error type
//! - [`date_parser`] - `created_at` timestamp formats
//! - [`input`] - Input document detection for the CLI
//! - [`report`] - Batch validation reports
//! - [`config`] - Layered configuration
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod config;
pub mod date_parser;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod parser;
pub mod report;

pub use cli::*;
pub use config::Config;
pub use date_parser::NaiveTimestampPolicy;
pub use error::{
    FieldPath, Result, TweetshapeError, ValidationError, ValidationErrorKind, format_error,
};
pub use input::InputDocument;
pub use model::*;
pub use parser::{
    UsernamePolicy, ValidationOptions, parse_search_response, parse_tweet, parse_tweet_str,
    parse_tweet_with, parse_tweets, validate_search_response,
};
pub use report::{BatchReport, Totals};
