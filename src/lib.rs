//! # emberdown
//!
//! A two-pass, byte-oriented Markdown parser that renders through a
//! user-supplied [`Renderer`]. The output format is whatever the renderer
//! makes of it; [`HtmlRenderer`] is the built-in HTML backend.
//!
//! ## Usage
//!
//! ```
//! use emberdown::{render_html, Extensions};
//!
//! // Plain Markdown
//! let html = render_html(b"# Hello, *world*!", &Extensions::default());
//! assert_eq!(html, "<h1>Hello, <em>world</em>!</h1>\n");
//!
//! // With extensions
//! let exts = Extensions {
//!     fenced_code: true,
//!     tables: true,
//!     ..Default::default()
//! };
//! let html = render_html(b"```rust\nfn main() {}\n```", &exts);
//! assert!(html.contains("language-rust"));
//! ```
//!
//! For custom output, implement [`Renderer`] and drive a [`Markdown`]
//! instance directly:
//!
//! ```
//! use emberdown::{Extensions, HtmlRenderer, Markdown};
//!
//! let mut md = Markdown::new(HtmlRenderer::new(), Extensions::all());
//! let mut out = Vec::new();
//! md.render(b"see [docs](http://example.com)", &mut out);
//! ```
//!
//! ## Extensions
//!
//! All optional syntax is off by default and toggled per field:
//!
//! | Syntax | Option |
//! |---|---|
//! | `\| table \|` | `tables` |
//! | ```` ``` ```` / `~~~` fences | `fenced_code` |
//! | `[^note]` | `footnotes` |
//! | bare URLs, `www.`, e-mail | `autolink` |
//! | `~~text~~` | `strikethrough` |
//! | `==text==` | `highlight` |
//! | `_text_` as underline | `underline` |
//! | `"text"` | `quote` |
//! | `^text` | `superscript` |

mod block;
mod html;
mod inline;
mod parser;
mod pool;
mod prescan;
mod refs;
mod render;

pub use html::HtmlRenderer;
pub use parser::Markdown;
pub use render::{AutolinkKind, Callbacks, CellFlags, ListFlags, Renderer, TableAlign};

/// Syntax extensions recognized by the parser. Everything defaults to off,
/// leaving the traditional Markdown dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Extensions {
    /// Pipe tables with an alignment underline.
    pub tables: bool,
    /// ```` ``` ```` / `~~~` fenced code blocks.
    pub fenced_code: bool,
    /// `[^id]` references and `[^id]:` definitions.
    pub footnotes: bool,
    /// Bare URL, `www.`, and e-mail autolinks.
    pub autolink: bool,
    /// `~~text~~`.
    pub strikethrough: bool,
    /// `==text==`.
    pub highlight: bool,
    /// Render `_text_` through the `underline` callback instead of `emphasis`.
    pub underline: bool,
    /// `"text"` quote spans.
    pub quote: bool,
    /// `^text` and `^(text)` superscript.
    pub superscript: bool,
    /// Require a space between `#` and ATX header text.
    pub space_headers: bool,
    /// Suppress emphasis delimiters inside words.
    pub no_intra_emphasis: bool,
    /// Let lists, HTML blocks and fences interrupt paragraphs without a
    /// blank line.
    pub lax_spacing: bool,
    /// Turn off 4-space-indented code blocks.
    pub disable_indented_code: bool,
}

impl Extensions {
    /// Every extension enabled.
    pub fn all() -> Self {
        Self {
            tables: true,
            fenced_code: true,
            footnotes: true,
            autolink: true,
            strikethrough: true,
            highlight: true,
            underline: true,
            quote: true,
            superscript: true,
            space_headers: true,
            no_intra_emphasis: true,
            lax_spacing: true,
            disable_indented_code: false,
        }
    }
}

/// Render a document to HTML with the built-in [`HtmlRenderer`].
pub fn render_html(document: &[u8], extensions: &Extensions) -> String {
    let mut md = Markdown::new(HtmlRenderer::new(), *extensions);
    let mut out = Vec::with_capacity(document.len() + document.len() / 2);
    md.render(document, &mut out);
    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Markdown whitespace. Tabs and carriage returns never survive the first
/// pass, so only space and newline count here.
#[inline(always)]
pub(crate) fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\n'
}
