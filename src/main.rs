use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write;

use feedriver::{aggregate, feed, group, render};

#[derive(Parser, Debug)]
#[command(
    name = "feedriver",
    version,
    about = "Merge RSS/Atom feeds into one chronological listing"
)]
struct Args {
    /// Feed URLs, or paths to files of newline-separated feed URLs
    #[arg(value_name = "URL|FILE", required = true)]
    feeds: Vec<String>,

    /// Write the HTML document to stdout instead of plain text
    #[arg(long, conflicts_with = "web")]
    html: bool,

    /// Render to a temporary HTML file and open it in the default browser
    #[arg(long)]
    web: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries only the rendered listing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.feeds.len() == 1 && args.feeds[0] == "version" {
        println!("feedriver {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut targets = Vec::new();
    for arg in &args.feeds {
        targets.extend(feed::resolve(arg)?);
    }
    if targets.is_empty() {
        bail!("no feed URLs to fetch: the given feed list files are empty");
    }

    let client = feed::http_client().context("failed to build HTTP client")?;
    let posts = aggregate::collect_posts(&client, targets, aggregate::DEFAULT_FETCH_BUDGET).await;
    let buckets = group::group_by_period(posts, group::Period::Month);

    if args.web {
        // Best effort: a browser that won't open still leaves a rendered
        // file behind and a successful exit.
        if let Err(e) = open_in_browser(&render::render_html(&buckets)) {
            tracing::error!(error = %format!("{e:#}"), "could not open listing in browser");
        }
    } else if args.html {
        print!("{}", render::render_html(&buckets));
    } else {
        let stdout = std::io::stdout();
        render::render_text(&mut stdout.lock(), &buckets)
            .context("failed to write listing to stdout")?;
    }

    Ok(())
}

fn open_in_browser(page: &str) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("feedriver-")
        .suffix(".html")
        .tempfile()
        .context("failed to create temporary HTML file")?;
    file.write_all(page.as_bytes())
        .context("failed to write temporary HTML file")?;

    // Keep the file: the browser loads it after we exit.
    let (_, path) = file.keep().context("failed to persist temporary HTML file")?;
    open::that(&path).with_context(|| format!("failed to open {} in a browser", path.display()))?;
    tracing::info!(path = %path.display(), "opened listing in browser");
    Ok(())
}
