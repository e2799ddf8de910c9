use crate::feed::ParsedFeed;
use chrono::{DateTime, Utc};
use url::Url;

/// A single normalized feed entry. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Entry title, possibly empty.
    pub title: String,
    /// Absolute URL of the entry.
    pub link: String,
    /// Publication time, falling back to the update time.
    pub timestamp: DateTime<Utc>,
    /// Endpoint the post was fetched from — the discovered URL when feed
    /// auto-discovery occurred, not necessarily the URL the user supplied.
    pub feed_link: String,
    /// Title of the source feed, possibly empty.
    pub feed_title: String,
}

/// Maps a parsed feed into posts, one per usable entry.
///
/// An entry's timestamp is its published time, or its updated time when
/// published is absent. Entries with neither, and entries without a link,
/// are skipped silently — logged, never an error.
pub fn normalize(endpoint: &Url, feed: ParsedFeed) -> Vec<Post> {
    let feed_title = feed.title;
    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let Some(timestamp) = entry.published.or(entry.updated) else {
                tracing::debug!(feed = %endpoint, entry = %entry.title, "no usable timestamp, skipping entry");
                return None;
            };
            let Some(link) = entry.link else {
                tracing::warn!(feed = %endpoint, entry = %entry.title, "no link, skipping entry");
                return None;
            };
            Some(Post {
                title: entry.title,
                link,
                timestamp,
                feed_link: endpoint.as_str().to_owned(),
                feed_title: feed_title.clone(),
            })
        })
        .collect()
}
