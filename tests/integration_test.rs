//! Integration tests for tweetshape.
//!
//! These tests exercise the public library API end to end:
//! - Single record validation and normalization
//! - Batch validation and reports
//! - X API v2 search responses
//! - Serialization round trips

use serde_json::{Value, json};
use std::collections::HashSet;
use std::thread;
use tweetshape::{
    BatchReport, InputDocument, Metrics, NaiveTimestampPolicy, Tweet, UsernamePolicy,
    ValidationErrorKind, ValidationOptions, parse_search_response, parse_tweet, parse_tweet_str,
    parse_tweet_with, parse_tweets,
};

fn spec_example() -> Value {
    json!({
        "text": " hello ",
        "author": {
            "username": "jdoe",
            "name": "J Doe",
            "profile_image_url": "https://x.com/a.png"
        },
        "created_at": "2024-01-01T00:00:00Z",
        "metrics": {"like_count": 3, "reply_count": 0, "retweet_count": 1}
    })
}

fn tweet_with(text: &str, likes: i64) -> Value {
    let mut value = spec_example();
    value["text"] = json!(text);
    value["metrics"]["like_count"] = json!(likes);
    value
}

#[test]
fn test_example_record_is_normalized() {
    tweetshape::logging::init_test_logging();

    let tweet = parse_tweet(&spec_example()).unwrap();
    assert_eq!(tweet.text(), "hello");
    assert_eq!(tweet.author().username(), "jdoe");
    assert_eq!(tweet.author().name(), "J Doe");
    assert_eq!(tweet.created_at().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert_eq!(*tweet.metrics(), Metrics::new(3, 0, 1));
}

#[test]
fn test_documented_failures() {
    let mut missing_text = spec_example();
    missing_text.as_object_mut().unwrap().remove("text");
    let err = parse_tweet(&missing_text).unwrap_err();
    assert_eq!(err.path(), "text");
    assert_eq!(err.kind(), ValidationErrorKind::Missing);

    let err = parse_tweet(&tweet_with("x", -1)).unwrap_err();
    assert_eq!(err.path(), "metrics.like_count");
    assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);

    let mut bad_date = spec_example();
    bad_date["created_at"] = json!("not-a-date");
    let err = parse_tweet(&bad_date).unwrap_err();
    assert_eq!(err.path(), "created_at");
    assert_eq!(err.kind(), ValidationErrorKind::Unparseable);
}

#[test]
fn test_username_policies() {
    let mut input = spec_example();
    input["author"]["username"] = json!("@jdoe");

    let stripped = parse_tweet(&input).unwrap();
    assert_eq!(stripped.author().username(), "jdoe");

    let strict = ValidationOptions {
        username_policy: UsernamePolicy::Reject,
        ..ValidationOptions::default()
    };
    let err = parse_tweet_with(&input, &strict).unwrap_err();
    assert_eq!(err.path(), "author.username");
    assert_eq!(err.kind(), ValidationErrorKind::WrongType);
}

#[test]
fn test_normalization_is_idempotent() {
    let first = parse_tweet(&spec_example()).unwrap();

    let text = serde_json::to_string(&first).unwrap();
    let second = parse_tweet_str(&text, &ValidationOptions::default()).unwrap();
    assert_eq!(second, first);

    let decoded: Tweet = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, first);

    // The stored form is already normalized, so strict policies accept it too.
    let strict = ValidationOptions {
        username_policy: UsernamePolicy::Reject,
        naive_timestamps: NaiveTimestampPolicy::Reject,
        require_https_images: true,
    };
    let third = parse_tweet_with(&serde_json::to_value(&second).unwrap(), &strict).unwrap();
    assert_eq!(third, first);
}

#[test]
fn test_equal_records_hash_equal() {
    let a = parse_tweet(&spec_example()).unwrap();
    let mut padded = spec_example();
    padded["text"] = json!("\thello\n");
    let b = parse_tweet(&padded).unwrap();

    let set: HashSet<Tweet> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_batch_validation_report() {
    let inputs = vec![
        tweet_with("one", 1),
        tweet_with("two", -2),
        json!({"text": "three"}),
        tweet_with("four", 4),
    ];

    let results = parse_tweets(&inputs, &ValidationOptions::default());
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().text(), "one");
    assert_eq!(results[3].as_ref().unwrap().text(), "four");

    let report = BatchReport::from_results("batch", &results);
    assert_eq!(report.valid, 2);
    assert_eq!(report.invalid, 2);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].error.path(), "[1].metrics.like_count");
    assert_eq!(report.failures[1].error.path(), "[2].author");
    assert_eq!(report.failures[1].error.kind(), ValidationErrorKind::Missing);
}

#[test]
fn test_concurrent_callers() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let input = tweet_with(&format!("tweet {i}"), i);
                parse_tweet(&input).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let tweet = handle.join().unwrap();
        assert_eq!(tweet.text(), format!("tweet {i}"));
        assert_eq!(tweet.metrics().like_count(), i as u64);
    }
}

#[test]
fn test_search_response_document() {
    let body = r##"{
        "data": [
            {
                "author_id": "1499992669480755204",
                "created_at": "2022-11-30T18:04:05.000Z",
                "id": "1597985290318594048",
                "public_metrics": {"retweet_count": 0, "reply_count": 2, "like_count": 7, "quote_count": 0},
                "text": "#ghigliottina la risposta è PANE"
            }
        ],
        "includes": {
            "users": [
                {
                    "id": "1499992669480755204",
                    "name": "Quizzettone",
                    "profile_image_url": "https://pbs.twimg.com/profile_images/1/q_normal.jpg",
                    "username": "quizzettone"
                }
            ]
        },
        "meta": {"newest_id": "1597985290318594048", "result_count": 1}
    }"##;

    let document = InputDocument::detect(body).unwrap();
    assert!(matches!(document, InputDocument::Envelope(_)));

    let value: Value = serde_json::from_str(body).unwrap();
    let tweets = parse_search_response(&value, &ValidationOptions::default()).unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].author().username(), "quizzettone");
    assert_eq!(tweets[0].author().name(), "Quizzettone");
    assert_eq!(tweets[0].metrics().reply_count(), 2);
    assert_eq!(tweets[0].text(), "#ghigliottina la risposta è PANE");
}

#[test]
fn test_json_lines_document() {
    let lines = [tweet_with("a", 1), tweet_with("b", 2)]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    let document = InputDocument::detect(&lines).unwrap();
    let results = document.validate(&ValidationOptions::default());
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(Result::is_ok));
}
