//! The renderer callback surface.
//!
//! A [`Renderer`] turns parsed constructs into output bytes. Every method
//! has a default: block-level callbacks do nothing, span-level callbacks
//! return `false` ("did not render"), and the low-level pair copies text
//! through verbatim. A span callback that returns `false` makes the parser
//! treat the construct as a non-match and emit its leading byte as plain
//! text.
//!
//! Child content is always rendered into a scratch buffer before the
//! parent callback runs, so `text` arguments hold finished output, not raw
//! Markdown. All `&[u8]` arguments are borrows that end with the call;
//! copy anything that must outlive it.

/// Kind of autolink handed to [`Renderer::autolink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutolinkKind {
    /// A scheme-qualified URL.
    Normal,
    /// An e-mail address (no `mailto:` prefix included).
    Email,
}

/// Column alignment of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableAlign {
    #[default]
    None,
    Left,
    Right,
    Center,
}

/// Flags passed to [`Renderer::table_cell`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellFlags {
    pub align: TableAlign,
    /// The cell belongs to the header row.
    pub header: bool,
}

/// Flags passed to [`Renderer::list`] and [`Renderer::listitem`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListFlags {
    pub ordered: bool,
    /// The item contained a blank line; its content was parsed as blocks.
    pub block: bool,
}

/// Which optional callbacks a renderer actually implements.
///
/// The parser wires its active-character table from this at construction
/// time, so a byte whose construct the renderer cannot render is never
/// treated as special at all. Only callbacks whose absence differs from
/// their default body are listed; everything else is governed purely by
/// the default ("do nothing" / "return false") behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Callbacks {
    pub emphasis: bool,
    pub double_emphasis: bool,
    pub triple_emphasis: bool,
    pub codespan: bool,
    pub linebreak: bool,
    pub link: bool,
    pub image: bool,
    pub autolink: bool,
    pub superscript: bool,
    pub blockhtml: bool,
}

impl Callbacks {
    /// No optional callbacks at all.
    pub fn none() -> Self {
        Self {
            emphasis: false,
            double_emphasis: false,
            triple_emphasis: false,
            codespan: false,
            linebreak: false,
            link: false,
            image: false,
            autolink: false,
            superscript: false,
            blockhtml: false,
        }
    }
}

impl Default for Callbacks {
    /// Everything present.
    fn default() -> Self {
        Self {
            emphasis: true,
            double_emphasis: true,
            triple_emphasis: true,
            codespan: true,
            linebreak: true,
            link: true,
            image: true,
            autolink: true,
            superscript: true,
            blockhtml: true,
        }
    }
}

/// Output callbacks invoked by the parser, in document order for siblings
/// and inside-out for nested constructs.
pub trait Renderer {
    /// Which optional callbacks this renderer provides.
    fn callbacks(&self) -> Callbacks {
        Callbacks::default()
    }

    // Block-level.

    /// A fenced or indented code block. `info` is the fence info string,
    /// empty for indented code or a bare fence.
    fn blockcode(&mut self, ob: &mut Vec<u8>, text: &[u8], info: &[u8]) {
        let _ = (ob, text, info);
    }

    fn blockquote(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        let _ = (ob, text);
    }

    fn blockhtml(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        let _ = (ob, text);
    }

    /// ATX or setext header, `level` in 1..=6.
    fn header(&mut self, ob: &mut Vec<u8>, text: &[u8], level: u32) {
        let _ = (ob, text, level);
    }

    fn hrule(&mut self, ob: &mut Vec<u8>) {
        let _ = ob;
    }

    fn list(&mut self, ob: &mut Vec<u8>, text: &[u8], flags: ListFlags) {
        let _ = (ob, text, flags);
    }

    fn listitem(&mut self, ob: &mut Vec<u8>, text: &[u8], flags: ListFlags) {
        let _ = (ob, text, flags);
    }

    fn paragraph(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        let _ = (ob, text);
    }

    /// `header` and `body` are the fully rendered row groups.
    fn table(&mut self, ob: &mut Vec<u8>, header: &[u8], body: &[u8]) {
        let _ = (ob, header, body);
    }

    fn table_row(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        let _ = (ob, text);
    }

    fn table_cell(&mut self, ob: &mut Vec<u8>, text: &[u8], flags: CellFlags) {
        let _ = (ob, text, flags);
    }

    /// The assembled footnote definitions, after the document body.
    fn footnotes(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        let _ = (ob, text);
    }

    fn footnote_def(&mut self, ob: &mut Vec<u8>, text: &[u8], num: u32) {
        let _ = (ob, text, num);
    }

    // Span-level. Returning `false` rejects the construct; the parser then
    // re-emits its bytes as plain text.

    fn autolink(&mut self, ob: &mut Vec<u8>, link: &[u8], kind: AutolinkKind) -> bool {
        let _ = (ob, link, kind);
        false
    }

    fn codespan(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn double_emphasis(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn emphasis(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn underline(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn highlight(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn quote(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    /// `title` and `alt` may be empty.
    fn image(&mut self, ob: &mut Vec<u8>, link: &[u8], title: &[u8], alt: &[u8]) -> bool {
        let _ = (ob, link, title, alt);
        false
    }

    fn linebreak(&mut self, ob: &mut Vec<u8>) -> bool {
        let _ = ob;
        false
    }

    /// `content` is the rendered display text; `link` and `title` may be
    /// empty.
    fn link(&mut self, ob: &mut Vec<u8>, link: &[u8], title: &[u8], content: &[u8]) -> bool {
        let _ = (ob, link, title, content);
        false
    }

    fn triple_emphasis(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn strikethrough(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn superscript(&mut self, ob: &mut Vec<u8>, text: &[u8]) -> bool {
        let _ = (ob, text);
        false
    }

    fn footnote_ref(&mut self, ob: &mut Vec<u8>, num: u32) -> bool {
        let _ = (ob, num);
        false
    }

    /// A raw inline tag, brackets included.
    fn raw_html_tag(&mut self, ob: &mut Vec<u8>, tag: &[u8]) -> bool {
        let _ = (ob, tag);
        false
    }

    // Low-level.

    /// An entity token (`&name;` / `&#123;`), passed through whole.
    fn entity(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        ob.extend_from_slice(text);
    }

    /// A run of bytes with no active construct in it.
    fn normal_text(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        ob.extend_from_slice(text);
    }

    // Document-level.

    fn doc_header(&mut self, ob: &mut Vec<u8>) {
        let _ = ob;
    }

    fn doc_footer(&mut self, ob: &mut Vec<u8>) {
        let _ = ob;
    }
}
