//! Presentation of the grouped listing: plain text and HTML.

mod html;
mod text;

pub use html::render_html;
pub use text::render_text;
