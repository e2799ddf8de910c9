use crate::feed::fetch_feed;
use crate::post::{normalize, Post};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Total wall-clock budget for the fetch phase, shared by every target.
pub const DEFAULT_FETCH_BUDGET: Duration = Duration::from_secs(30);

/// Upper bound on in-flight fetches. Generous enough to behave like
/// unbounded fan-out for hand-curated feed lists, bounded for large ones.
pub const MAX_CONCURRENT_FETCHES: usize = 16;

/// Fetches, parses, and normalizes every target concurrently, returning the
/// union of all successfully produced posts.
///
/// One deadline is armed for the whole phase; every network await observes
/// it, so a target still in flight when the budget runs out resolves to a
/// deadline error and contributes nothing. Per-target failures of any kind
/// are logged with the feed URL and likewise contribute zero posts — the
/// aggregate itself never fails. All tasks are drained before returning.
///
/// The returned posts carry no ordering guarantee; ordering is the
/// grouper's job.
pub async fn collect_posts(
    client: &reqwest::Client,
    targets: Vec<Url>,
    budget: Duration,
) -> Vec<Post> {
    let deadline = Instant::now() + budget;

    let per_feed: Vec<Vec<Post>> = stream::iter(targets)
        .map(|target| {
            let client = client.clone();
            async move {
                match fetch_feed(&client, &target, deadline).await {
                    Ok(fetched) => {
                        let posts = normalize(&fetched.endpoint, fetched.feed);
                        tracing::info!(feed = %fetched.endpoint, posts = posts.len(), "fetched feed");
                        posts
                    }
                    Err(e) => {
                        tracing::error!(feed = %target, error = %e, "skipping feed");
                        Vec::new()
                    }
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    per_feed.into_iter().flatten().collect()
}
