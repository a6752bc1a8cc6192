//! Block-level parsing: one construct is consumed from the front of the
//! normalized text per iteration, rendered inside-out through the
//! renderer callbacks.

mod html_block;
mod leaf_blocks;

use leaf_blocks::*;

pub(crate) use leaf_blocks::is_empty_line;

use crate::is_space;
use crate::parser::Markdown;
use crate::pool::BufferClass;
use crate::render::{CellFlags, ListFlags, Renderer, TableAlign};

/// Shared state of one list while its items are parsed. `block` and
/// `ended` are sticky across items, like the construct flags they feed.
struct ListState {
    ordered: bool,
    block: bool,
    ended: bool,
}

impl<R: Renderer> Markdown<R> {
    /// Consume blocks from `data` until it is exhausted, appending their
    /// rendering to `ob`. Recursion is bounded by the pool depth.
    pub(crate) fn parse_block(&mut self, ob: &mut Vec<u8>, data: &[u8]) {
        if self.pool.depth() > self.max_nesting {
            return;
        }

        let size = data.len();
        let mut beg = 0;

        while beg < size {
            let txt = &data[beg..];

            beg += 'blk: {
                if is_atx_header(txt, self.exts.space_headers) {
                    break 'blk self.parse_atx_header(ob, txt);
                }

                if txt[0] == b'<' && self.cb.blockhtml {
                    let i = self.parse_html_block(ob, txt, true);
                    if i != 0 {
                        break 'blk i;
                    }
                }

                let i = is_empty_line(txt);
                if i != 0 {
                    break 'blk i;
                }

                if is_hrule(txt) {
                    self.renderer.hrule(ob);
                    let mut i = 0;
                    while i < txt.len() && txt[i] != b'\n' {
                        i += 1;
                    }
                    break 'blk i + 1;
                }

                if self.exts.fenced_code {
                    let i = self.parse_fenced_code(ob, txt);
                    if i != 0 {
                        break 'blk i;
                    }
                }

                if self.exts.tables {
                    let i = self.parse_table(ob, txt);
                    if i != 0 {
                        break 'blk i;
                    }
                }

                if quote_prefix(txt) > 0 {
                    break 'blk self.parse_blockquote(ob, txt);
                }

                if !self.exts.disable_indented_code && code_prefix(txt) > 0 {
                    break 'blk self.parse_indented_code(ob, txt);
                }

                if unordered_prefix(txt) > 0 {
                    break 'blk self.parse_list(ob, txt, false);
                }

                if ordered_prefix(txt) > 0 {
                    break 'blk self.parse_list(ob, txt, true);
                }

                self.parse_paragraph(ob, txt)
            };
        }
    }

    fn parse_atx_header(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> usize {
        let size = data.len();

        let mut level = 0;
        while level < size && level < 6 && data[level] == b'#' {
            level += 1;
        }

        let mut i = level;
        while i < size && data[i] == b' ' {
            i += 1;
        }

        let mut end = i;
        while end < size && data[end] != b'\n' {
            end += 1;
        }
        let skip = end;

        while end > 0 && data[end - 1] == b'#' {
            end -= 1;
        }
        while end > 0 && data[end - 1] == b' ' {
            end -= 1;
        }

        if end > i {
            let mut work = self.pool.acquire(BufferClass::Span);
            self.parse_inline(&mut work, &data[i..end]);
            self.renderer.header(ob, &work, level as u32);
            self.pool.release(BufferClass::Span, work);
        }

        skip
    }

    fn parse_blockquote(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> usize {
        let size = data.len();
        let mut out = self.pool.acquire(BufferClass::Block);

        // prefix-stripped body; built here because the quoted lines are
        // not contiguous in the input
        let mut work: Vec<u8> = Vec::new();

        let mut beg = 0;
        let mut end = 0;
        while beg < size {
            end = beg + 1;
            while end < size && data[end - 1] != b'\n' {
                end += 1;
            }

            let pre = quote_prefix(&data[beg..end]);
            if pre > 0 {
                beg += pre;
            } else if is_empty_line(&data[beg..end]) > 0
                && (end >= size
                    || (quote_prefix(&data[end..]) == 0 && is_empty_line(&data[end..]) == 0))
            {
                // empty line followed by a non-quote line ends the quote
                break;
            }

            if beg < end {
                work.extend_from_slice(&data[beg..end]);
            }
            beg = end;
        }

        self.parse_block(&mut out, &work);
        self.renderer.blockquote(ob, &out);
        self.pool.release(BufferClass::Block, out);
        end
    }

    fn parse_paragraph(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> usize {
        let size = data.len();
        let mut i = 0;
        let mut end = 0;
        let mut level = 0;

        while i < size {
            end = i + 1;
            while end < size && data[end - 1] != b'\n' {
                end += 1;
            }

            if is_empty_line(&data[i..]) > 0 {
                break;
            }

            level = setext_level(&data[i..]);
            if level != 0 {
                break;
            }

            if is_atx_header(&data[i..], self.exts.space_headers)
                || is_hrule(&data[i..])
                || quote_prefix(&data[i..]) > 0
            {
                end = i;
                break;
            }

            // under lax spacing a block opener on the next line ends the
            // paragraph without a blank line
            if self.exts.lax_spacing && !data[i].is_ascii_alphanumeric() {
                if ordered_prefix(&data[i..]) > 0 || unordered_prefix(&data[i..]) > 0 {
                    end = i;
                    break;
                }

                if data[i] == b'<'
                    && self.cb.blockhtml
                    && self.parse_html_block(ob, &data[i..], false) > 0
                {
                    end = i;
                    break;
                }

                if self.exts.fenced_code && is_code_fence(&data[i..]).is_some() {
                    end = i;
                    break;
                }
            }

            i = end;
        }

        let mut work_size = i;
        while work_size > 0 && data[work_size - 1] == b'\n' {
            work_size -= 1;
        }

        if level == 0 {
            let mut tmp = self.pool.acquire(BufferClass::Block);
            self.parse_inline(&mut tmp, &data[..work_size]);
            self.renderer.paragraph(ob, &tmp);
            self.pool.release(BufferClass::Block, tmp);
        } else {
            // setext header: the last line is the header text, anything
            // before it is still a paragraph
            let mut header_beg = 0;
            let mut header_end = work_size;

            if work_size > 0 {
                let saved = work_size;
                let mut ws = work_size - 1;
                while ws > 0 && data[ws] != b'\n' {
                    ws -= 1;
                }
                let beg = ws + 1;
                while ws > 0 && data[ws - 1] == b'\n' {
                    ws -= 1;
                }

                if ws > 0 {
                    let mut tmp = self.pool.acquire(BufferClass::Block);
                    self.parse_inline(&mut tmp, &data[..ws]);
                    self.renderer.paragraph(ob, &tmp);
                    self.pool.release(BufferClass::Block, tmp);

                    header_beg = beg;
                    header_end = saved;
                } else {
                    header_beg = 0;
                    header_end = saved;
                }
            }

            let mut work = self.pool.acquire(BufferClass::Span);
            self.parse_inline(&mut work, &data[header_beg..header_end]);
            self.renderer.header(ob, &work, level);
            self.pool.release(BufferClass::Span, work);
        }

        end
    }

    fn parse_fenced_code(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> usize {
        let size = data.len();

        let Some((mut beg, info)) = is_code_fence(data) else {
            return 0;
        };

        let mut work = self.pool.acquire(BufferClass::Block);

        while beg < size {
            if let Some((fence_end, trail)) = is_code_fence(&data[beg..])
                && trail.1 == trail.0
            {
                beg += fence_end;
                break;
            }

            let mut end = beg + 1;
            while end < size && data[end - 1] != b'\n' {
                end += 1;
            }

            if beg < end {
                // verbatim copy, entities untouched
                if is_empty_line(&data[beg..end]) > 0 {
                    work.push(b'\n');
                } else {
                    work.extend_from_slice(&data[beg..end]);
                }
            }
            beg = end;
        }

        if !work.is_empty() && work[work.len() - 1] != b'\n' {
            work.push(b'\n');
        }

        self.renderer.blockcode(ob, &work, &data[info.0..info.1]);
        self.pool.release(BufferClass::Block, work);
        beg
    }

    fn parse_indented_code(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> usize {
        let size = data.len();
        let mut work = self.pool.acquire(BufferClass::Block);

        let mut beg = 0;
        while beg < size {
            let mut end = beg + 1;
            while end < size && data[end - 1] != b'\n' {
                end += 1;
            }

            let pre = code_prefix(&data[beg..end]);
            if pre > 0 {
                beg += pre;
            } else if is_empty_line(&data[beg..end]) == 0 {
                // non-empty non-prefixed line breaks the block
                break;
            }

            if beg < end {
                if is_empty_line(&data[beg..end]) > 0 {
                    work.push(b'\n');
                } else {
                    work.extend_from_slice(&data[beg..end]);
                }
            }
            beg = end;
        }

        while !work.is_empty() && work[work.len() - 1] == b'\n' {
            work.pop();
        }
        work.push(b'\n');

        self.renderer.blockcode(ob, &work, &[]);
        self.pool.release(BufferClass::Block, work);
        beg
    }

    fn parse_list(&mut self, ob: &mut Vec<u8>, data: &[u8], ordered: bool) -> usize {
        let mut work = self.pool.acquire(BufferClass::Block);
        let mut state = ListState {
            ordered,
            block: false,
            ended: false,
        };

        let mut i = 0;
        while i < data.len() {
            let j = self.parse_list_item(&mut work, &data[i..], &mut state);
            i += j;
            if j == 0 || state.ended {
                break;
            }
        }

        let flags = ListFlags {
            ordered: state.ordered,
            block: state.block,
        };
        self.renderer.list(ob, &work, flags);
        self.pool.release(BufferClass::Block, work);
        i
    }

    /// One list item, its marker still in place. Continuation lines keep
    /// one level of indentation; a blank line inside upgrades the item to
    /// block-level content.
    fn parse_list_item(&mut self, ob: &mut Vec<u8>, data: &[u8], state: &mut ListState) -> usize {
        let size = data.len();

        // indentation of the marker itself
        let mut orgpre = 0;
        while orgpre < 3 && orgpre < size && data[orgpre] == b' ' {
            orgpre += 1;
        }

        let mut beg = unordered_prefix(data);
        if beg == 0 {
            beg = ordered_prefix(data);
        }
        if beg == 0 {
            return 0;
        }

        let mut end = beg;
        while end < size && data[end - 1] != b'\n' {
            end += 1;
        }

        let mut work = self.pool.acquire(BufferClass::Span);
        let mut inter = self.pool.acquire(BufferClass::Span);

        work.extend_from_slice(&data[beg..end]);
        beg = end;

        let mut in_empty = false;
        let mut has_inside_empty = false;
        let mut in_fence = false;
        let mut sublist = 0;

        while beg < size {
            end += 1;
            while end < size && data[end - 1] != b'\n' {
                end += 1;
            }

            if is_empty_line(&data[beg..end]) > 0 {
                in_empty = true;
                beg = end;
                continue;
            }

            let mut pre = 0;
            while pre < 4 && beg + pre < end && data[beg + pre] == b' ' {
                pre += 1;
            }

            let line = &data[beg + pre..end];

            // an odd fence inside the item turns list detection off until
            // the matching fence shows up
            if self.exts.fenced_code && is_code_fence(line).is_some() {
                in_fence = !in_fence;
            }

            let (has_next_uli, has_next_oli) = if in_fence {
                (0, 0)
            } else {
                (unordered_prefix(line), ordered_prefix(line))
            };

            // switching between ordered and unordered ends the list
            if in_empty
                && ((state.ordered && has_next_uli > 0) || (!state.ordered && has_next_oli > 0))
            {
                state.ended = true;
                break;
            }

            if (has_next_uli > 0 && !is_hrule(line)) || has_next_oli > 0 {
                if in_empty {
                    has_inside_empty = true;
                }
                // same indentation means a sibling item
                if pre == orgpre {
                    break;
                }
                if sublist == 0 {
                    sublist = work.len();
                }
            } else if in_empty && pre == 0 {
                // joining only indented stuff after empty lines
                state.ended = true;
                break;
            } else if in_empty {
                work.push(b'\n');
                has_inside_empty = true;
            }

            in_empty = false;
            work.extend_from_slice(line);
            beg = end;
        }

        if has_inside_empty {
            state.block = true;
        }

        let flags = ListFlags {
            ordered: state.ordered,
            block: state.block,
        };

        if state.block {
            // block-level rendering of the item contents
            if sublist > 0 && sublist < work.len() {
                self.parse_block(&mut inter, &work[..sublist]);
                self.parse_block(&mut inter, &work[sublist..]);
            } else {
                self.parse_block(&mut inter, &work);
            }
        } else {
            // inline rendering, any sublist parsed as blocks
            if sublist > 0 && sublist < work.len() {
                self.parse_inline(&mut inter, &work[..sublist]);
                self.parse_block(&mut inter, &work[sublist..]);
            } else {
                self.parse_inline(&mut inter, &work);
            }
        }

        self.renderer.listitem(ob, &inter, flags);
        self.pool.release(BufferClass::Span, inter);
        self.pool.release(BufferClass::Span, work);
        beg
    }

    /// Header row plus alignment underline. Returns the bytes consumed
    /// and the per-column alignment, or (0, empty) when the lines are not
    /// a table head.
    fn parse_table_header(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> (usize, Vec<TableAlign>) {
        let size = data.len();

        let mut pipes = 0i32;
        let mut i = 0;
        while i < size && data[i] != b'\n' {
            if data[i] == b'|' {
                pipes += 1;
            }
            i += 1;
        }

        if i == size || pipes == 0 {
            return (0, Vec::new());
        }

        let mut header_end = i;
        while header_end > 0 && is_space(data[header_end - 1]) {
            header_end -= 1;
        }

        if data[0] == b'|' {
            pipes -= 1;
        }
        if header_end > 0 && data[header_end - 1] == b'|' {
            pipes -= 1;
        }
        if pipes < 0 {
            return (0, Vec::new());
        }

        let columns = pipes as usize + 1;
        let mut aligns = vec![TableAlign::None; columns];

        // underline: |? *:?-+:? *(|…)+ with at least 3 marker bytes per
        // column
        i += 1;
        if i < size && data[i] == b'|' {
            i += 1;
        }

        let mut under_end = i;
        while under_end < size && data[under_end] != b'\n' {
            under_end += 1;
        }

        let mut col = 0;
        while col < columns && i < under_end {
            let mut dashes = 0;

            while i < under_end && data[i] == b' ' {
                i += 1;
            }

            let mut left = false;
            let mut right = false;

            if i < under_end && data[i] == b':' {
                i += 1;
                left = true;
                dashes += 1;
            }

            while i < under_end && data[i] == b'-' {
                i += 1;
                dashes += 1;
            }

            if i < under_end && data[i] == b':' {
                i += 1;
                right = true;
                dashes += 1;
            }

            while i < under_end && data[i] == b' ' {
                i += 1;
            }

            if i < under_end && data[i] != b'|' && data[i] != b'+' {
                break;
            }

            if dashes < 3 {
                break;
            }

            aligns[col] = match (left, right) {
                (true, true) => TableAlign::Center,
                (true, false) => TableAlign::Left,
                (false, true) => TableAlign::Right,
                (false, false) => TableAlign::None,
            };

            i += 1;
            col += 1;
        }

        if col < columns {
            return (0, Vec::new());
        }

        self.parse_table_row(ob, &data[..header_end], &aligns, true);
        (under_end + 1, aligns)
    }

    fn parse_table_row(
        &mut self,
        ob: &mut Vec<u8>,
        data: &[u8],
        aligns: &[TableAlign],
        header: bool,
    ) {
        let size = data.len();
        let mut row_work = self.pool.acquire(BufferClass::Span);

        let mut i = 0;
        if i < size && data[i] == b'|' {
            i += 1;
        }

        let mut col = 0;
        while col < aligns.len() && i < size {
            let mut cell_work = self.pool.acquire(BufferClass::Span);

            while i < size && is_space(data[i]) {
                i += 1;
            }
            let cell_start = i;

            while i < size && data[i] != b'|' {
                i += 1;
            }

            let mut cell_end = i - 1;
            while cell_end > cell_start && is_space(data[cell_end]) {
                cell_end -= 1;
            }

            // an empty cell leaves cell_end one short of cell_start
            self.parse_inline(&mut cell_work, &data[cell_start..cell_end + 1]);

            let flags = CellFlags {
                align: aligns[col],
                header,
            };
            self.renderer.table_cell(&mut row_work, &cell_work, flags);

            self.pool.release(BufferClass::Span, cell_work);
            i += 1;
            col += 1;
        }

        while col < aligns.len() {
            let flags = CellFlags {
                align: aligns[col],
                header,
            };
            self.renderer.table_cell(&mut row_work, &[], flags);
            col += 1;
        }

        self.renderer.table_row(ob, &row_work);
        self.pool.release(BufferClass::Span, row_work);
    }

    fn parse_table(&mut self, ob: &mut Vec<u8>, data: &[u8]) -> usize {
        let size = data.len();

        let mut header_work = self.pool.acquire(BufferClass::Span);
        let mut body_work = self.pool.acquire(BufferClass::Block);

        let (mut i, aligns) = self.parse_table_header(&mut header_work, data);
        if i > 0 {
            while i < size {
                let row_start = i;
                let mut pipes = 0;

                while i < size && data[i] != b'\n' {
                    if data[i] == b'|' {
                        pipes += 1;
                    }
                    i += 1;
                }

                if pipes == 0 || i == size {
                    i = row_start;
                    break;
                }

                self.parse_table_row(&mut body_work, &data[row_start..i], &aligns, false);
                i += 1;
            }

            self.renderer.table(ob, &header_work, &body_work);
        }

        self.pool.release(BufferClass::Block, body_work);
        self.pool.release(BufferClass::Span, header_work);
        i
    }

    /// Render every used footnote, in first-use order, then hand the
    /// assembled list to the `footnotes` callback. A footnote referenced
    /// for the first time from inside another footnote still makes it in.
    pub(crate) fn parse_footnote_list(&mut self, ob: &mut Vec<u8>) {
        if self.footnotes.used.is_empty() {
            return;
        }

        let mut work = self.pool.acquire(BufferClass::Block);

        let mut k = 0;
        while k < self.footnotes.used.len() {
            let idx = self.footnotes.used[k];
            let contents = std::mem::take(&mut self.footnotes.entries[idx].contents);
            let num = self.footnotes.entries[idx].num;
            self.parse_footnote_def(&mut work, num, &contents);
            k += 1;
        }

        self.renderer.footnotes(ob, &work);
        self.pool.release(BufferClass::Block, work);
    }

    fn parse_footnote_def(&mut self, ob: &mut Vec<u8>, num: u32, contents: &[u8]) {
        let mut work = self.pool.acquire(BufferClass::Span);
        self.parse_block(&mut work, contents);
        self.renderer.footnote_def(ob, &work, num);
        self.pool.release(BufferClass::Span, work);
    }
}
