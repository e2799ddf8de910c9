use url::Url;

/// Scans raw HTML for a `<link>` tag advertising an RSS or Atom feed and
/// resolves its `href` against the page URL.
///
/// Uses simple string scanning (no HTML parser dependency) over the two
/// known feed MIME types, `application/rss+xml` and `application/atom+xml`.
/// Absolute hrefs are used as-is; anything else is joined against the page
/// URL, so an href of `/feed.xml` lands on the same host. This is a
/// best-effort heuristic, not a general HTML or relative-URL resolver.
///
/// Returns the first matching feed URL, or `None` if no feed link is found.
pub fn find_feed_link(html: &str, base: &Url) -> Option<Url> {
    let html_lower = html.to_lowercase();
    let mut search_from = 0;

    while let Some(link_start) = html_lower[search_from..].find("<link") {
        let abs_start = search_from + link_start;
        let remaining = &html_lower[abs_start..];

        // Find the end of this <link> tag
        let tag_end = match remaining.find('>') {
            Some(pos) => pos,
            None => break,
        };

        let tag = &remaining[..=tag_end];

        if is_feed_type(tag) {
            // Extract href from the original (non-lowered) HTML to preserve URL case
            let original_tag = html
                .get(abs_start..abs_start + tag_end + 1)
                .unwrap_or(tag);
            if let Some(href) = extract_attr_value(original_tag, "href") {
                return resolve_href(href, base);
            }
        }

        search_from = abs_start + tag_end + 1;
    }

    None
}

/// Checks if a lowercased `<link>` tag has an RSS or Atom feed type.
fn is_feed_type(tag: &str) -> bool {
    tag.contains("application/rss+xml") || tag.contains("application/atom+xml")
}

/// Extracts the value of an attribute from a tag string (case-preserving).
fn extract_attr_value<'a>(tag: &'a str, attr_name: &str) -> Option<&'a str> {
    let tag_lower = tag.to_lowercase();
    let attr_prefix = format!("{attr_name}=");

    let attr_start = tag_lower.find(&attr_prefix)?;
    let value_start = attr_start + attr_prefix.len();

    if value_start >= tag.len() {
        return None;
    }

    let rest = &tag[value_start..];
    let quote = rest.as_bytes().first()?;

    if *quote != b'"' && *quote != b'\'' {
        return None;
    }

    let quote_char = *quote as char;
    let inner = &rest[1..];
    let end = inner.find(quote_char)?;

    Some(&inner[..end])
}

fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Url::parse(href).ok();
    }
    base.join(href).ok()
}
