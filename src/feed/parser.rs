use chrono::{DateTime, Utc};
use feed_rs::parser::{ParseErrorKind, ParseFeedError};
use thiserror::Error;

/// Failure classification for the parser adapter.
///
/// `NotAFeed` is the signal the fetcher uses to attempt link discovery;
/// a `Malformed` feed is a recognized type that could not be read and is
/// never retried.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not a recognized feed type")]
    NotAFeed,
    #[error("malformed feed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: String,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, ParseError> {
    let feed = feed_rs::parser::parse(bytes).map_err(classify)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| ParsedEntry {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            link: entry.links.first().map(|l| l.href.clone()),
            published: entry.published,
            updated: entry.updated,
        })
        .collect();

    Ok(ParsedFeed {
        title: feed.title.map(|t| t.content).unwrap_or_default(),
        entries,
    })
}

fn classify(err: ParseFeedError) -> ParseError {
    match err {
        ParseFeedError::ParseError(ParseErrorKind::NoFeedRoot)
        | ParseFeedError::ParseError(ParseErrorKind::UnknownMimeType(_)) => ParseError::NotAFeed,
        other => ParseError::Malformed(other.to_string()),
    }
}
