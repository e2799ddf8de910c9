use crate::post::Post;
use chrono::{DateTime, Datelike, Utc};

/// Display-period granularity for grouping posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Day,
}

impl Period {
    /// Truncation key: posts with equal keys share a bucket.
    fn key(self, ts: &DateTime<Utc>) -> (i32, u32) {
        match self {
            Period::Month => (ts.year(), ts.month()),
            Period::Day => (ts.year(), ts.ordinal()),
        }
    }

    fn label(self, ts: &DateTime<Utc>) -> String {
        match self {
            Period::Month => ts.format("%b %Y").to_string(),
            Period::Day => ts.format("%b %-d %Y").to_string(),
        }
    }
}

/// A run of posts sharing one display period, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub posts: Vec<Post>,
}

/// Sorts posts newest-first and groups them into contiguous same-period
/// buckets, most recent period first.
///
/// Posts with equal timestamps land in the same bucket in unspecified
/// relative order. An empty input yields an empty result.
pub fn group_by_period(mut posts: Vec<Post>, period: Period) -> Vec<Bucket> {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut last_key = None;
    for post in posts {
        let key = period.key(&post.timestamp);
        match buckets.last_mut() {
            Some(bucket) if last_key == Some(key) => bucket.posts.push(post),
            _ => {
                let label = period.label(&post.timestamp);
                buckets.push(Bucket {
                    label,
                    posts: vec![post],
                });
                last_key = Some(key);
            }
        }
    }
    buckets
}
