use super::is_empty_line;
use crate::parser::Markdown;
use crate::render::Renderer;

/// HTML elements that open a raw block when a line starts with their tag.
/// Sorted for binary search; matched ASCII-case-insensitively.
static BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "del",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "iframe",
    "ins",
    "main",
    "math",
    "menu",
    "nav",
    "noframes",
    "noscript",
    "ol",
    "p",
    "pre",
    "script",
    "section",
    "style",
    "table",
    "ul",
];

/// Look a tag name up in the block-element table, returning its canonical
/// spelling.
pub(crate) fn find_block_tag(name: &[u8]) -> Option<&'static str> {
    if name.is_empty() || name.len() > 10 {
        return None;
    }
    let mut lower = [0u8; 10];
    for (i, &b) in name.iter().enumerate() {
        if !b.is_ascii_alphanumeric() {
            return None;
        }
        lower[i] = b.to_ascii_lowercase();
    }
    let needle = &lower[..name.len()];
    BLOCK_TAGS
        .binary_search_by(|probe| probe.as_bytes().cmp(needle))
        .ok()
        .map(|idx| BLOCK_TAGS[idx])
}

/// Match `</tag>` at the start of `data`, followed by a blank rest of
/// line and an optional blank line. Returns the matched length, 0 on
/// mismatch.
fn html_block_end_tag(tag: &str, data: &[u8]) -> usize {
    let tag_len = tag.len();

    if tag_len + 3 >= data.len()
        || !data[2..2 + tag_len].eq_ignore_ascii_case(tag.as_bytes())
        || data[tag_len + 2] != b'>'
    {
        return 0;
    }

    let mut i = tag_len + 3;
    let mut w = 0;
    if i < data.len() {
        w = is_empty_line(&data[i..]);
        if w == 0 {
            return 0; // non-blank after tag
        }
    }
    i += w;
    w = 0;

    if i < data.len() {
        w = is_empty_line(&data[i..]);
    }

    i + w
}

/// Find the closing `</tag>` for a block. With `start_of_line`, closing
/// tags inside the block only count when they sit at a line start (the
/// opening line itself is exempt).
fn html_block_end(tag: &str, data: &[u8], start_of_line: bool) -> usize {
    let size = data.len();
    let mut i = 1;
    let mut block_lines = 0;

    while i < size {
        i += 1;
        while i < size && !(data[i - 1] == b'<' && data[i] == b'/') {
            if data[i] == b'\n' {
                block_lines += 1;
            }
            i += 1;
        }

        if i + 2 + tag.len() >= size {
            break;
        }

        if start_of_line && block_lines > 0 && data[i - 2] != b'\n' {
            continue;
        }

        let end_tag = html_block_end_tag(tag, &data[i - 1..]);
        if end_tag != 0 {
            return i + end_tag - 1;
        }
    }

    0
}

impl<R: Renderer> Markdown<R> {
    /// Parse a raw HTML block. With `do_render` false this is only a
    /// probe (used for paragraph interruption) and emits nothing.
    pub(crate) fn parse_html_block(&mut self, ob: &mut Vec<u8>, data: &[u8], do_render: bool) -> usize {
        let size = data.len();

        if size < 2 || data[0] != b'<' {
            return 0;
        }

        let mut i = 1;
        while i < size && data[i] != b'>' && data[i] != b' ' {
            i += 1;
        }

        let tag = if i < size {
            find_block_tag(&data[1..i])
        } else {
            None
        };

        let Some(tag) = tag else {
            // comment, laxist form
            if size > 5 && data[1] == b'!' && data[2] == b'-' && data[3] == b'-' {
                let mut i = 5;
                while i < size && !(data[i - 2] == b'-' && data[i - 1] == b'-' && data[i] == b'>') {
                    i += 1;
                }
                i += 1;

                if i < size {
                    let j = is_empty_line(&data[i..]);
                    if j > 0 {
                        let work_size = i + j;
                        if do_render {
                            self.renderer.blockhtml(ob, &data[..work_size.min(size)]);
                        }
                        return work_size;
                    }
                }
            }

            // hr, the only self-closing block tag considered
            if size > 4 && (data[1] == b'h' || data[1] == b'H') && (data[2] == b'r' || data[2] == b'R')
            {
                let mut i = 3;
                while i < size && data[i] != b'>' {
                    i += 1;
                }
                if i + 1 < size {
                    i += 1;
                    let j = is_empty_line(&data[i..]);
                    if j > 0 {
                        let work_size = i + j;
                        if do_render {
                            self.renderer.blockhtml(ob, &data[..work_size.min(size)]);
                        }
                        return work_size;
                    }
                }
            }

            return 0;
        };

        // first pass: unindented closing tag followed by a blank line
        let mut tag_end = html_block_end(tag, data, true);

        // second pass accepts any close, except for ins/del
        if tag_end == 0 && tag != "ins" && tag != "del" {
            tag_end = html_block_end(tag, data, false);
        }

        if tag_end == 0 {
            return 0;
        }

        if do_render {
            self.renderer.blockhtml(ob, &data[..tag_end.min(size)]);
        }
        tag_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_block_tags_case_insensitively() {
        assert_eq!(find_block_tag(b"div"), Some("div"));
        assert_eq!(find_block_tag(b"DIV"), Some("div"));
        assert_eq!(find_block_tag(b"blockquote"), Some("blockquote"));
        assert_eq!(find_block_tag(b"span"), None);
        assert_eq!(find_block_tag(b""), None);
    }

    #[test]
    fn table_is_sorted_for_binary_search() {
        for pair in BLOCK_TAGS.windows(2) {
            assert!(pair[0] < pair[1], "{:?} out of order", pair);
        }
    }
}
