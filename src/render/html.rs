use crate::group::Bucket;
use url::Url;

const STYLE: &str = "\
body {
	margin: 0 auto;
	max-width: 800px;
	color: #888;
	font-family: -apple-system,system-ui,BlinkMacSystemFont,\"Segoe UI\",Roboto,\"Helvetica Neue\",Arial,sans-serif;
	font-size: 14px;
	line-height: 1.4em;
}
h4   {color: #000;}
a {color: #000;}
a:visited {color: #888;}
";

/// Renders the grouped listing as a standalone HTML document.
///
/// Period labels become `<h4>` headers; each post is a `<div>` linking the
/// title, with the feed's host in parentheses for attribution. All
/// interpolated text is escaped.
pub fn render_html(buckets: &[Bucket]) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<head>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    for bucket in buckets {
        out.push_str(&format!("<h4>{}</h4>\n", escape(&bucket.label)));
        for post in &bucket.posts {
            out.push_str(&format!(
                "<div><a href=\"{}\">{}</a> ({})</div>\n",
                escape(&post.link),
                escape(&post.title),
                escape(&feed_host(&post.feed_link)),
            ));
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Host portion of the feed endpoint, for compact attribution.
fn feed_host(feed_link: &str) -> String {
    Url::parse(feed_link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_default()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
