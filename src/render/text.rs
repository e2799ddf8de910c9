use crate::group::Bucket;
use std::io::{self, Write};

/// Column width a short title is padded to before its link.
const TITLE_COLUMNS: usize = 70;

/// Writes the grouped listing as plain text.
///
/// Each bucket prints its period label, then one entry per post: the title
/// left-padded to 70 columns followed by the link. A title longer than 70
/// characters gets its own line, with the link indented beneath it.
pub fn render_text<W: Write>(w: &mut W, buckets: &[Bucket]) -> io::Result<()> {
    for bucket in buckets {
        writeln!(w, "{}", bucket.label)?;
        for post in &bucket.posts {
            if post.title.chars().count() > TITLE_COLUMNS {
                writeln!(w, "    {}", post.title)?;
                writeln!(w, "    {:width$} {}", "", post.link, width = TITLE_COLUMNS)?;
            } else {
                writeln!(
                    w,
                    "    {:<width$} {}",
                    post.title,
                    post.link,
                    width = TITLE_COLUMNS
                )?;
            }
        }
    }
    Ok(())
}
