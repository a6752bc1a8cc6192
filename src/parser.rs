//! Parser state and the two-pass `render` driver.

use crate::Extensions;
use crate::pool::WorkPool;
use crate::prescan::{expand_tabs, scan_footnote_def, scan_link_ref};
use crate::refs::{FootnoteList, RefTable};
use crate::render::{Callbacks, Renderer};

pub(crate) const DEFAULT_MAX_NESTING: usize = 16;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// What a byte may start inside inline text. One entry per byte value;
/// `None` means "copy through".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum InlineKind {
    #[default]
    None,
    Emphasis,
    Codespan,
    Linebreak,
    Link,
    Langle,
    Escape,
    Entity,
    AutolinkUrl,
    AutolinkEmail,
    AutolinkWww,
    Superscript,
    Quote,
}

/// A Markdown parser bound to one renderer.
///
/// An instance owns its working state (reference tables, buffer pools) and
/// can render any number of documents, one at a time; it is not meant to be
/// shared between threads.
pub struct Markdown<R: Renderer> {
    pub(crate) renderer: R,
    pub(crate) cb: Callbacks,
    pub(crate) exts: Extensions,
    pub(crate) refs: RefTable,
    pub(crate) footnotes: FootnoteList,
    pub(crate) active: [InlineKind; 256],
    pub(crate) pool: WorkPool,
    pub(crate) max_nesting: usize,
    pub(crate) in_link_body: bool,
}

impl<R: Renderer> Markdown<R> {
    /// Build a parser with the default nesting limit.
    pub fn new(renderer: R, extensions: Extensions) -> Self {
        Self::with_max_nesting(renderer, extensions, DEFAULT_MAX_NESTING)
    }

    /// Build a parser with an explicit bound on recursive nesting. When a
    /// construct would nest deeper, its subtree is skipped rather than
    /// rendered.
    pub fn with_max_nesting(renderer: R, extensions: Extensions, max_nesting: usize) -> Self {
        let cb = renderer.callbacks();
        Self {
            active: build_active_table(&cb, &extensions),
            cb,
            renderer,
            exts: extensions,
            refs: RefTable::new(),
            footnotes: FootnoteList::new(),
            pool: WorkPool::new(),
            max_nesting: max_nesting.max(1),
            in_link_body: false,
        }
    }

    /// Consume the parser and hand the renderer back.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Render `document` into `ob`.
    ///
    /// Pass 1 collects reference and footnote definitions and normalizes
    /// the remaining text (tabs to spaces, one `\n` per line). Pass 2
    /// parses blocks and invokes the renderer. Used footnotes are rendered
    /// after the body, then all per-document state is dropped.
    pub fn render(&mut self, document: &[u8], ob: &mut Vec<u8>) {
        self.refs.clear();
        self.footnotes.clear();
        self.in_link_body = false;

        let mut text: Vec<u8> = Vec::with_capacity(document.len());

        let mut beg = 0;
        if document.starts_with(UTF8_BOM) {
            beg = UTF8_BOM.len();
        }

        while beg < document.len() {
            if self.exts.footnotes
                && let Some(def) = scan_footnote_def(document, beg)
            {
                self.footnotes
                    .add(&document[def.id.0..def.id.1], def.contents);
                beg = def.end;
            } else if let Some(r) = scan_link_ref(document, beg) {
                let link = document[r.link.0..r.link.1].to_vec();
                let title = r.title.map(|(s, e)| document[s..e].to_vec());
                self.refs.add(&document[r.id.0..r.id.1], link, title);
                beg = r.end;
            } else {
                let mut end = beg;
                while end < document.len() && document[end] != b'\n' && document[end] != b'\r' {
                    end += 1;
                }

                if end > beg {
                    expand_tabs(&mut text, &document[beg..end]);
                }

                // one \n per source line, whatever the ending style
                while end < document.len() && (document[end] == b'\n' || document[end] == b'\r') {
                    if document[end] == b'\n'
                        || (end + 1 < document.len() && document[end + 1] != b'\n')
                    {
                        text.push(b'\n');
                    }
                    end += 1;
                }

                beg = end;
            }
        }

        ob.reserve(text.len() + (text.len() >> 1));

        self.renderer.doc_header(ob);

        if !text.is_empty() {
            if text[text.len() - 1] != b'\n' && text[text.len() - 1] != b'\r' {
                text.push(b'\n');
            }
            self.parse_block(ob, &text);
        }

        if self.exts.footnotes {
            self.parse_footnote_list(ob);
        }

        self.renderer.doc_footer(ob);

        self.refs.clear();
        self.footnotes.clear();

        debug_assert_eq!(self.pool.depth(), 0);
    }
}

fn build_active_table(cb: &Callbacks, exts: &Extensions) -> [InlineKind; 256] {
    let mut t = [InlineKind::None; 256];

    if cb.emphasis || cb.double_emphasis || cb.triple_emphasis {
        t[b'*' as usize] = InlineKind::Emphasis;
        t[b'_' as usize] = InlineKind::Emphasis;
        if exts.strikethrough {
            t[b'~' as usize] = InlineKind::Emphasis;
        }
        if exts.highlight {
            t[b'=' as usize] = InlineKind::Emphasis;
        }
    }

    if cb.codespan {
        t[b'`' as usize] = InlineKind::Codespan;
    }
    if cb.linebreak {
        t[b'\n' as usize] = InlineKind::Linebreak;
    }
    if cb.image || cb.link {
        t[b'[' as usize] = InlineKind::Link;
    }

    t[b'<' as usize] = InlineKind::Langle;
    t[b'\\' as usize] = InlineKind::Escape;
    t[b'&' as usize] = InlineKind::Entity;

    if exts.autolink {
        t[b':' as usize] = InlineKind::AutolinkUrl;
        t[b'@' as usize] = InlineKind::AutolinkEmail;
        t[b'w' as usize] = InlineKind::AutolinkWww;
    }
    if exts.superscript {
        t[b'^' as usize] = InlineKind::Superscript;
    }
    if exts.quote {
        t[b'"' as usize] = InlineKind::Quote;
    }

    t
}
