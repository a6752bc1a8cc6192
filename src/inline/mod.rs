//! Inline parsing: a left-to-right scan over one span of text. Runs of
//! inactive bytes go to `normal_text`; active bytes dispatch to a
//! handler that returns how many bytes it consumed, 0 meaning "no
//! construct here, emit the byte verbatim".

mod autolink;
mod emphasis;

use crate::is_space;
use crate::parser::{InlineKind, Markdown};
use crate::pool::BufferClass;
use crate::refs::LinkRef;
use crate::render::{AutolinkKind, Renderer};

impl<R: Renderer> Markdown<R> {
    /// Scan `data` and render its inline constructs into `ob`. Bails out
    /// (rendering nothing) past the nesting limit.
    pub(crate) fn parse_inline(&mut self, ob: &mut Vec<u8>, data: &[u8]) {
        if self.pool.depth() > self.max_nesting {
            return;
        }

        let size = data.len();
        let mut i = 0;
        let mut end = 0;

        while i < size {
            let mut action = InlineKind::None;
            while end < size {
                action = self.active[data[end] as usize];
                if action != InlineKind::None {
                    break;
                }
                end += 1;
            }

            self.renderer.normal_text(ob, &data[i..end]);

            if end >= size {
                break;
            }
            i = end;

            let consumed = match action {
                InlineKind::Emphasis => self.char_emphasis(ob, data, i),
                InlineKind::Codespan => self.char_codespan(ob, data, i),
                InlineKind::Linebreak => self.char_linebreak(ob, data, i),
                InlineKind::Link => self.char_link(ob, data, i),
                InlineKind::Langle => self.char_langle_tag(ob, data, i),
                InlineKind::Escape => self.char_escape(ob, data, i),
                InlineKind::Entity => self.char_entity(ob, data, i),
                InlineKind::AutolinkUrl => self.char_autolink_url(ob, data, i),
                InlineKind::AutolinkEmail => self.char_autolink_email(ob, data, i),
                InlineKind::AutolinkWww => self.char_autolink_www(ob, data, i),
                InlineKind::Superscript => self.char_superscript(ob, data, i),
                InlineKind::Quote => self.char_quote(ob, data, i),
                InlineKind::None => 0,
            };

            if consumed == 0 {
                // the byte joins the next normal-text run
                end = i + 1;
            } else {
                i += consumed;
                end = i;
            }
        }
    }

    /// `` ` ``: a code span. The closing run must have the same length as
    /// the opener; one space is trimmed from each side when present.
    fn char_codespan(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        let txt = &data[pos..];
        let size = txt.len();

        let mut nb = 0;
        while nb < size && txt[nb] == b'`' {
            nb += 1;
        }

        let mut i = 0;
        let mut end = nb;
        while end < size && i < nb {
            if txt[end] == b'`' {
                i += 1;
            } else {
                i = 0;
            }
            end += 1;
        }

        if i < nb && end >= size {
            return 0; // no matching delimiter
        }

        let mut f_begin = nb;
        while f_begin < end && txt[f_begin] == b' ' {
            f_begin += 1;
        }

        let mut f_end = end - nb;
        while f_end > nb && txt[f_end - 1] == b' ' {
            f_end -= 1;
        }

        let rendered = if f_begin < f_end {
            self.renderer.codespan(ob, &txt[f_begin..f_end])
        } else {
            self.renderer.codespan(ob, &[])
        };

        if rendered { end } else { 0 }
    }

    /// `"`: a quote span, symmetric to the code span.
    fn char_quote(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        let txt = &data[pos..];
        let size = txt.len();

        let mut nq = 0;
        while nq < size && txt[nq] == b'"' {
            nq += 1;
        }

        let mut i = 0;
        let mut end = nq;
        while end < size && i < nq {
            if txt[end] == b'"' {
                i += 1;
            } else {
                i = 0;
            }
            end += 1;
        }

        if i < nq && end >= size {
            return 0;
        }

        let mut f_begin = nq;
        while f_begin < end && txt[f_begin] == b' ' {
            f_begin += 1;
        }

        let mut f_end = end - nq;
        while f_end > nq && txt[f_end - 1] == b' ' {
            f_end -= 1;
        }

        let rendered = if f_begin < f_end {
            self.renderer.quote(ob, &txt[f_begin..f_end])
        } else {
            self.renderer.quote(ob, &[])
        };

        if rendered { end } else { 0 }
    }

    /// `\n` preceded by two spaces: a hard break. The trailing spaces are
    /// dropped from the output either way.
    fn char_linebreak(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        if pos < 2 || data[pos - 1] != b' ' || data[pos - 2] != b' ' {
            return 0;
        }

        while ob.last() == Some(&b' ') {
            ob.pop();
        }

        if self.renderer.linebreak(ob) { 1 } else { 0 }
    }

    /// `\`: escape one byte of the escape set.
    fn char_escape(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        const ESCAPE_CHARS: &[u8] = b"\\`*_{}[]()#+-.!:|&<>^~";

        let txt = &data[pos..];
        if txt.len() > 1 {
            if !ESCAPE_CHARS.contains(&txt[1]) {
                return 0;
            }
            self.renderer.normal_text(ob, &txt[1..2]);
        } else {
            ob.push(txt[0]);
        }

        2
    }

    /// `&`: pass `&#?[A-Za-z0-9]*;` through the entity callback, emit a
    /// lone ampersand verbatim.
    fn char_entity(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        let txt = &data[pos..];
        let size = txt.len();
        let mut end = 1;

        if end < size && txt[end] == b'#' {
            end += 1;
        }

        while end < size && txt[end].is_ascii_alphanumeric() {
            end += 1;
        }

        if end < size && txt[end] == b';' {
            end += 1;
        } else {
            return 0;
        }

        self.renderer.entity(ob, &txt[..end]);
        end
    }

    /// `<`: an HTML tag, or an autolink in angle brackets.
    fn char_langle_tag(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        let txt = &data[pos..];
        let (end, kind) = tag_length(txt);

        if end <= 2 {
            return 0;
        }

        let rendered = match kind {
            Some(kind) if self.cb.autolink => {
                let mut u_link = self.pool.acquire(BufferClass::Span);
                unescape_into(&mut u_link, &txt[1..end - 1]);
                let r = self.renderer.autolink(ob, &u_link, kind);
                self.pool.release(BufferClass::Span, u_link);
                r
            }
            _ => self.renderer.raw_html_tag(ob, &txt[..end]),
        };

        if rendered { end } else { 0 }
    }

    fn char_autolink_www(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        if !self.cb.link || self.in_link_body {
            return 0;
        }

        let Some(scan) = autolink::scan_www(data, pos) else {
            return 0;
        };

        let link = &data[scan.start..scan.end];

        let mut link_url = self.pool.acquire(BufferClass::Span);
        link_url.extend_from_slice(b"http://");
        link_url.extend_from_slice(link);

        ob.truncate(ob.len().saturating_sub(scan.rewind));

        let mut link_text = self.pool.acquire(BufferClass::Span);
        self.renderer.normal_text(&mut link_text, link);
        self.renderer.link(ob, &link_url, &[], &link_text);
        self.pool.release(BufferClass::Span, link_text);
        self.pool.release(BufferClass::Span, link_url);

        scan.end - pos
    }

    fn char_autolink_email(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        if !self.cb.autolink || self.in_link_body {
            return 0;
        }

        let Some(scan) = autolink::scan_email(data, pos) else {
            return 0;
        };

        ob.truncate(ob.len().saturating_sub(scan.rewind));
        self.renderer
            .autolink(ob, &data[scan.start..scan.end], AutolinkKind::Email);

        scan.end - pos
    }

    fn char_autolink_url(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        if !self.cb.autolink || self.in_link_body {
            return 0;
        }

        let Some(scan) = autolink::scan_url(data, pos) else {
            return 0;
        };

        ob.truncate(ob.len().saturating_sub(scan.rewind));
        self.renderer
            .autolink(ob, &data[scan.start..scan.end], AutolinkKind::Normal);

        scan.end - pos
    }

    /// `[`: a link, image, or footnote reference.
    fn char_link(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        let is_img = pos > 0 && data[pos - 1] == b'!';
        let txt = &data[pos..];
        let size = txt.len();

        if (is_img && !self.cb.image) || (!is_img && !self.cb.link) {
            return 0;
        }

        // matching closing bracket, tracking escapes and nesting
        let mut level = 1i32;
        let mut i = 1;
        let mut text_has_nl = false;
        while i < size {
            if txt[i] == b'\n' {
                text_has_nl = true;
            } else if txt[i - 1] == b'\\' {
                i += 1;
                continue;
            } else if txt[i] == b'[' {
                level += 1;
            } else if txt[i] == b']' {
                level -= 1;
                if level <= 0 {
                    break;
                }
            }
            i += 1;
        }

        if i >= size {
            return 0;
        }

        let txt_e = i;
        i += 1;

        // footnote reference
        if self.exts.footnotes && txt[1] == b'^' {
            if txt_e < 3 {
                return 0;
            }

            let mut rendered = false;
            if let Some(idx) = self.footnotes.find(&txt[2..txt_e]) {
                // the ordinal is assigned on first use, rendered or not
                let num = self.footnotes.mark_used(idx);
                rendered = self.renderer.footnote_ref(ob, num);
            }

            return if rendered { i } else { 0 };
        }

        // skip any amount of whitespace or newline between the label and
        // the destination; laxer than strict Markdown
        while i < size && is_space(txt[i]) {
            i += 1;
        }

        // where the link and title come from
        let mut link_buf: Option<Vec<u8>> = None;
        let mut title_buf: Option<Vec<u8>> = None;
        let mut link_range: Option<(usize, usize)> = None;
        let mut title_range: Option<(usize, usize)> = None;

        if i < size && txt[i] == b'(' {
            // inline style
            i += 1;
            while i < size && is_space(txt[i]) {
                i += 1;
            }

            let link_b = i;

            // link end: ) or a quoted title after whitespace, with
            // balanced inner parentheses
            let mut nb_p = 0;
            while i < size {
                if txt[i] == b'\\' {
                    i += 2;
                } else if txt[i] == b'(' {
                    nb_p += 1;
                    i += 1;
                } else if txt[i] == b')' {
                    if nb_p == 0 {
                        break;
                    }
                    nb_p -= 1;
                    i += 1;
                } else if i >= 1 && is_space(txt[i - 1]) && (txt[i] == b'\'' || txt[i] == b'"') {
                    break;
                } else {
                    i += 1;
                }
            }

            if i >= size {
                return 0;
            }
            let mut link_e = i;

            let mut title_b = 0;
            let mut title_e = 0;
            if txt[i] == b'\'' || txt[i] == b'"' {
                let qtype = txt[i];
                let mut in_title = true;
                i += 1;
                title_b = i;

                while i < size {
                    if txt[i] == b'\\' {
                        i += 2;
                    } else if txt[i] == qtype {
                        in_title = false;
                        i += 1;
                    } else if txt[i] == b')' && !in_title {
                        break;
                    } else {
                        i += 1;
                    }
                }

                if i >= size {
                    return 0;
                }

                // back from the closing paren over whitespace to the
                // closing quote; no quote means it was all link
                title_e = i - 1;
                while title_e > title_b && is_space(txt[title_e]) {
                    title_e -= 1;
                }

                if txt[title_e] != b'\'' && txt[title_e] != b'"' {
                    title_b = 0;
                    title_e = 0;
                    link_e = i;
                }
            }

            while link_e > link_b && is_space(txt[link_e - 1]) {
                link_e -= 1;
            }

            // strip optional angle brackets
            let mut link_b = link_b;
            if txt[link_b] == b'<' {
                link_b += 1;
            }
            if txt[link_e - 1] == b'>' {
                link_e -= 1;
            }

            if link_e > link_b {
                link_range = Some((link_b, link_e));
            }
            if title_e > title_b {
                title_range = Some((title_b, title_e));
            }

            i += 1;
        } else if i < size && txt[i] == b'[' {
            // reference style
            i += 1;
            let id_b = i;
            while i < size && txt[i] != b']' {
                i += 1;
            }
            if i >= size {
                return 0;
            }
            let id_e = i;

            let found = if id_b == id_e {
                // empty brackets: the link text is the id
                if text_has_nl {
                    let mut id = self.pool.acquire(BufferClass::Span);
                    squash_newlines(&mut id, &txt[..txt_e]);
                    let hit = copy_ref(self.refs.find(&id), &mut self.pool);
                    self.pool.release(BufferClass::Span, id);
                    hit
                } else {
                    copy_ref(self.refs.find(&txt[1..txt_e]), &mut self.pool)
                }
            } else {
                copy_ref(self.refs.find(&txt[id_b..id_e]), &mut self.pool)
            };

            let Some((l, t)) = found else {
                return 0;
            };
            link_buf = Some(l);
            title_buf = t;
            i += 1;
        } else {
            // shortcut reference
            let found = if text_has_nl {
                let mut id = self.pool.acquire(BufferClass::Span);
                squash_newlines(&mut id, &txt[..txt_e]);
                let hit = copy_ref(self.refs.find(&id), &mut self.pool);
                self.pool.release(BufferClass::Span, id);
                hit
            } else {
                copy_ref(self.refs.find(&txt[1..txt_e]), &mut self.pool)
            };

            let Some((l, t)) = found else {
                return 0;
            };
            link_buf = Some(l);
            title_buf = t;

            // rewind past the whitespace that was not part of the form
            i = txt_e + 1;
        }

        // content: an image's alt text stays raw, link text is parsed
        // inline with autolinking off
        let mut content = self.pool.acquire(BufferClass::Span);
        if txt_e > 1 {
            if is_img {
                content.extend_from_slice(&txt[1..txt_e]);
            } else {
                let prev_in_link = self.in_link_body;
                self.in_link_body = true;
                self.parse_inline(&mut content, &data[pos + 1..pos + txt_e]);
                self.in_link_body = prev_in_link;
            }
        }

        let mut u_link: Option<Vec<u8>> = None;
        if let Some(l) = &link_buf {
            let mut u = self.pool.acquire(BufferClass::Span);
            unescape_into(&mut u, l);
            u_link = Some(u);
        } else if let Some((lb, le)) = link_range {
            let mut u = self.pool.acquire(BufferClass::Span);
            unescape_into(&mut u, &txt[lb..le]);
            u_link = Some(u);
        }

        let link_slice: &[u8] = u_link.as_deref().unwrap_or(&[]);
        let title_slice: &[u8] = match (&title_buf, title_range) {
            (Some(t), _) => t,
            (None, Some((b, e))) => &txt[b..e],
            _ => &[],
        };

        let rendered = if is_img {
            if ob.last() == Some(&b'!') {
                ob.pop();
            }
            self.renderer.image(ob, link_slice, title_slice, &content)
        } else {
            self.renderer.link(ob, link_slice, title_slice, &content)
        };

        if let Some(u) = u_link {
            self.pool.release(BufferClass::Span, u);
        }
        self.pool.release(BufferClass::Span, content);
        if let Some(t) = title_buf {
            self.pool.release(BufferClass::Span, t);
        }
        if let Some(l) = link_buf {
            self.pool.release(BufferClass::Span, l);
        }

        if rendered { i } else { 0 }
    }

    /// `^`: superscript, either a bare token or `^(…)`.
    fn char_superscript(&mut self, ob: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
        if !self.cb.superscript {
            return 0;
        }

        let txt = &data[pos..];
        let size = txt.len();
        if size < 2 {
            return 0;
        }

        let sup_start;
        let mut sup_len;

        if txt[1] == b'(' {
            sup_start = 2;
            sup_len = 2;

            while sup_len < size && txt[sup_len] != b')' && txt[sup_len - 1] != b'\\' {
                sup_len += 1;
            }

            if sup_len == size {
                return 0;
            }
        } else {
            sup_start = 1;
            sup_len = 1;

            while sup_len < size && !is_space(txt[sup_len]) {
                sup_len += 1;
            }
        }

        if sup_len == sup_start {
            return if sup_start == 2 { 3 } else { 0 };
        }

        let mut sup = self.pool.acquire(BufferClass::Span);
        self.parse_inline(&mut sup, &data[pos + sup_start..pos + sup_len]);
        self.renderer.superscript(ob, &sup);
        self.pool.release(BufferClass::Span, sup);

        if sup_start == 2 { sup_len + 1 } else { sup_len }
    }
}

/// Length of an HTML tag or angle autolink at the start of `data`, and
/// the autolink kind when it is one. 0 when nothing tag-shaped is here.
fn tag_length(data: &[u8]) -> (usize, Option<AutolinkKind>) {
    let size = data.len();

    // a valid tag can't be shorter than 3 bytes
    if size < 3 || data[0] != b'<' {
        return (0, None);
    }

    let mut i = if data[1] == b'/' { 2 } else { 1 };

    if !data[i].is_ascii_alphanumeric() {
        return (0, None);
    }

    // scheme test: the leading run could be a URI scheme or a mail
    // address local part
    while i < size
        && (data[i].is_ascii_alphanumeric() || data[i] == b'.' || data[i] == b'+' || data[i] == b'-')
    {
        i += 1;
    }

    if i > 1 && i < size && data[i] == b'@' {
        if let Some(j) = is_mail_autolink(&data[i..]) {
            return (i + j, Some(AutolinkKind::Email));
        }
    }

    if i > 2 && i < size && data[i] == b':' {
        // completing the autolink test: no whitespace or quotes allowed
        // before the closing bracket
        i += 1;
        if i < size {
            let j = i;

            while i < size {
                if data[i] == b'\\' {
                    i += 2;
                } else if data[i] == b'>'
                    || data[i] == b'\''
                    || data[i] == b'"'
                    || data[i] == b' '
                    || data[i] == b'\n'
                {
                    break;
                } else {
                    i += 1;
                }
            }

            if i >= size {
                return (0, None);
            }
            if i > j && data[i] == b'>' {
                return (i + 1, Some(AutolinkKind::Normal));
            }
            // a forbidden byte: not an autolink, maybe still a tag
        }
    }

    // looking for something that closes like a tag
    while i < size && data[i] != b'>' {
        i += 1;
    }
    if i >= size {
        return (0, None);
    }
    (i + 1, None)
}

/// Address part of a mail autolink plus the closing `>`. Assumed to be
/// `[-@._a-zA-Z0-9]+` with exactly one `@`; laxer than strict e-mail
/// syntax.
fn is_mail_autolink(data: &[u8]) -> Option<usize> {
    let mut nb = 0;

    for (i, &b) in data.iter().enumerate() {
        if b.is_ascii_alphanumeric() {
            continue;
        }
        match b {
            b'@' => nb += 1,
            b'-' | b'.' | b'_' => {}
            b'>' => return if nb == 1 { Some(i + 1) } else { None },
            _ => return None,
        }
    }

    None
}

/// Copy `src` with backslash escapes resolved.
fn unescape_into(ob: &mut Vec<u8>, src: &[u8]) {
    let mut i = 0;
    while i < src.len() {
        let org = i;
        while i < src.len() && src[i] != b'\\' {
            i += 1;
        }

        if i > org {
            ob.extend_from_slice(&src[org..i]);
        }

        if i + 1 >= src.len() {
            break;
        }

        ob.push(src[i + 1]);
        i += 2;
    }
}

/// Copy the bracketed text (index 0 is the `[`) with newlines collapsed
/// to single spaces, for use as a reference id.
fn squash_newlines(ob: &mut Vec<u8>, data: &[u8]) {
    let mut j = 1;
    while j < data.len() {
        if data[j] != b'\n' {
            ob.push(data[j]);
        } else if data[j - 1] != b' ' {
            ob.push(b' ');
        }
        j += 1;
    }
}

/// Copy a reference hit into pool buffers so the table borrow ends here.
fn copy_ref(
    entry: Option<&LinkRef>,
    pool: &mut crate::pool::WorkPool,
) -> Option<(Vec<u8>, Option<Vec<u8>>)> {
    let entry = entry?;

    let mut link = pool.acquire(BufferClass::Span);
    link.extend_from_slice(&entry.link);

    let title = entry.title.as_ref().map(|t| {
        let mut buf = pool.acquire(BufferClass::Span);
        buf.extend_from_slice(t);
        buf
    });

    Some((link, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_length_detects_tags_and_autolinks() {
        assert_eq!(tag_length(b"<em>x"), (4, None));
        assert_eq!(tag_length(b"</em>"), (5, None));
        assert_eq!(
            tag_length(b"<http://x.com>"),
            (14, Some(AutolinkKind::Normal))
        );
        assert_eq!(
            tag_length(b"<mail@site.com>"),
            (15, Some(AutolinkKind::Email))
        );
        assert_eq!(tag_length(b"<>"), (0, None));
        assert_eq!(tag_length(b"<no close"), (0, None));
    }

    #[test]
    fn mail_autolink_allows_consecutive_dots() {
        assert_eq!(is_mail_autolink(b"a..b@c>"), Some(7));
        assert_eq!(is_mail_autolink(b"a@b@c>"), None);
        assert_eq!(is_mail_autolink(b"a b@c>"), None);
    }

    #[test]
    fn unescape_resolves_backslashes() {
        let mut out = Vec::new();
        unescape_into(&mut out, b"a\\*b\\\\c");
        assert_eq!(out, b"a*b\\c");

        out.clear();
        unescape_into(&mut out, b"trailing\\");
        assert_eq!(out, b"trailing");
    }

    #[test]
    fn squash_turns_newlines_into_single_spaces() {
        let mut out = Vec::new();
        squash_newlines(&mut out, b"[a\nb");
        assert_eq!(out, b"a b");

        out.clear();
        squash_newlines(&mut out, b"[a \nb");
        assert_eq!(out, b"a b");
    }
}
