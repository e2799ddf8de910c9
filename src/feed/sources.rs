use std::path::Path;
use thiserror::Error;
use url::Url;

/// Errors raised while resolving a feed argument into target URLs.
///
/// Both variants are fatal to the whole invocation: the user gave input we
/// cannot act on, so the run aborts before any network activity.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The argument (or a line of the referenced file) is not a valid URL.
    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    /// The argument names a file that could not be read.
    #[error("failed to read feed list {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves one CLI argument into feed targets.
///
/// An argument naming an existing regular file is read as newline-separated
/// feed URLs (blank lines skipped, file order preserved); any other argument
/// is parsed as a single URL. No network access happens here.
pub fn resolve(arg: &str) -> Result<Vec<Url>, SourceError> {
    let path = Path::new(arg);
    if path.is_file() {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: arg.to_owned(),
            source,
        })?;
        parse_url_lines(&contents)
    } else {
        Ok(vec![parse_url(arg)?])
    }
}

fn parse_url_lines(contents: &str) -> Result<Vec<Url>, SourceError> {
    contents
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(parse_url)
        .collect()
}

fn parse_url(input: &str) -> Result<Url, SourceError> {
    Url::parse(input).map_err(|source| SourceError::InvalidUrl {
        input: input.to_owned(),
        source,
    })
}
