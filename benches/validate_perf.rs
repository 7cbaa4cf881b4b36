//! Validation throughput benchmarks.
//!
//! Run with: `cargo bench --bench validate_perf`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use tweetshape::{ValidationOptions, parse_search_response, parse_tweet, parse_tweets};

fn sample_tweet(i: usize) -> Value {
    json!({
        "text": format!("  benchmark tweet number {i} with some text  "),
        "author": {
            "username": format!("@user_{i}"),
            "name": format!("User {i}"),
            "profile_image_url": format!("https://pbs.twimg.com/profile_images/{i}/a.jpg")
        },
        "created_at": "Wed Jan 08 12:00:00 +0000 2025",
        "metrics": {"like_count": i, "reply_count": i / 2, "retweet_count": i / 3}
    })
}

fn search_body(n: usize) -> Value {
    let data: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "id": i.to_string(),
                "author_id": (i % 10).to_string(),
                "text": format!("tweet {i}"),
                "created_at": "2022-11-30T18:04:05.000Z",
                "public_metrics": {"like_count": i, "reply_count": 0, "retweet_count": 1, "quote_count": 0}
            })
        })
        .collect();
    let users: Vec<Value> = (0..10)
        .map(|i| {
            json!({
                "id": i.to_string(),
                "name": format!("User {i}"),
                "username": format!("user{i}"),
                "profile_image_url": "https://pbs.twimg.com/u.jpg"
            })
        })
        .collect();
    json!({"data": data, "includes": {"users": users}, "meta": {"result_count": n}})
}

fn bench_single(c: &mut Criterion) {
    let input = sample_tweet(42);
    c.bench_function("parse_tweet", |b| {
        b.iter(|| parse_tweet(black_box(&input)));
    });
}

fn bench_batch(c: &mut Criterion) {
    let options = ValidationOptions::default();
    let mut group = c.benchmark_group("parse_tweets");
    for size in [100_usize, 1_000, 10_000] {
        let inputs: Vec<Value> = (0..size).map(sample_tweet).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            b.iter(|| parse_tweets(black_box(inputs), &options));
        });
    }
    group.finish();
}

fn bench_search_response(c: &mut Criterion) {
    let options = ValidationOptions::default();
    let body = search_body(100);
    c.bench_function("parse_search_response/100", |b| {
        b.iter(|| parse_search_response(black_box(&body), &options));
    });
}

criterion_group!(benches, bench_single, bench_batch, bench_search_response);
criterion_main!(benches);
