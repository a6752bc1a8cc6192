use crate::is_space;

/// Length of an empty line (terminator included), 0 when the line holds
/// anything but spaces.
pub(crate) fn is_empty_line(data: &[u8]) -> usize {
    let mut i = 0;
    while i < data.len() && data[i] != b'\n' {
        if data[i] != b' ' {
            return 0;
        }
        i += 1;
    }
    i + 1
}

/// Three or more of the same `*`, `-` or `_` with nothing but spaces
/// around them.
pub(super) fn is_hrule(data: &[u8]) -> bool {
    let size = data.len();
    if size < 3 {
        return false;
    }

    let mut i = 0;
    if data[0] == b' ' {
        i = 1;
        if data[1] == b' ' {
            i = 2;
            if data[2] == b' ' {
                i = 3;
            }
        }
    }

    if i + 2 >= size || (data[i] != b'*' && data[i] != b'-' && data[i] != b'_') {
        return false;
    }
    let c = data[i];

    let mut n = 0;
    while i < size && data[i] != b'\n' {
        if data[i] == c {
            n += 1;
        } else if data[i] != b' ' {
            return false;
        }
        i += 1;
    }

    n >= 3
}

/// Width of a fence opener (`~~~` / ```` ``` ````, ≥3, up to 3 leading
/// spaces), 0 when the line is not one.
fn fence_prefix_width(data: &[u8]) -> usize {
    let size = data.len();
    if size < 3 {
        return 0;
    }

    let mut i = 0;
    if data[0] == b' ' {
        i = 1;
        if data[1] == b' ' {
            i = 2;
            if data[2] == b' ' {
                i = 3;
            }
        }
    }

    if i + 2 >= size || !(data[i] == b'~' || data[i] == b'`') {
        return 0;
    }
    let c = data[i];

    let mut n = 0;
    while i < size && data[i] == c {
        n += 1;
        i += 1;
    }

    if n < 3 { 0 } else { i }
}

/// Check a whole fence line. Returns the consumed length (terminator
/// included) and the info-string range, which is a single word or a `{…}`
/// group; anything else on the line disqualifies it.
pub(super) fn is_code_fence(data: &[u8]) -> Option<(usize, (usize, usize))> {
    let size = data.len();
    let mut i = fence_prefix_width(data);
    if i == 0 {
        return None;
    }

    while i < size && data[i] == b' ' {
        i += 1;
    }

    let mut syn_start = i;
    let mut syn_len = 0;

    if i < size && data[i] == b'{' {
        i += 1;
        syn_start += 1;

        while i < size && data[i] != b'}' && data[i] != b'\n' {
            syn_len += 1;
            i += 1;
        }

        if i == size || data[i] != b'}' {
            return None;
        }

        // strip whitespace inside the braces
        while syn_len > 0 && is_space(data[syn_start]) {
            syn_start += 1;
            syn_len -= 1;
        }
        while syn_len > 0 && is_space(data[syn_start + syn_len - 1]) {
            syn_len -= 1;
        }

        i += 1;
    } else {
        while i < size && !is_space(data[i]) {
            syn_len += 1;
            i += 1;
        }
    }

    while i < size && data[i] != b'\n' {
        if !is_space(data[i]) {
            return None;
        }
        i += 1;
    }

    Some((i + 1, (syn_start, syn_start + syn_len)))
}

/// A `#`-prefixed line; under `space_headers` the run must be followed by
/// a space.
pub(super) fn is_atx_header(data: &[u8], space_headers: bool) -> bool {
    if data.is_empty() || data[0] != b'#' {
        return false;
    }

    if space_headers {
        let mut level = 0;
        while level < data.len() && level < 6 && data[level] == b'#' {
            level += 1;
        }
        if level < data.len() && data[level] != b' ' {
            return false;
        }
    }

    true
}

/// Setext underline level: 1 for `===`, 2 for `---`, 0 otherwise.
pub(super) fn setext_level(data: &[u8]) -> u32 {
    let size = data.len();
    if size == 0 {
        return 0;
    }

    if data[0] == b'=' {
        let mut i = 1;
        while i < size && data[i] == b'=' {
            i += 1;
        }
        while i < size && data[i] == b' ' {
            i += 1;
        }
        return if i >= size || data[i] == b'\n' { 1 } else { 0 };
    }

    if data[0] == b'-' {
        let mut i = 1;
        while i < size && data[i] == b'-' {
            i += 1;
        }
        while i < size && data[i] == b' ' {
            i += 1;
        }
        return if i >= size || data[i] == b'\n' { 2 } else { 0 };
    }

    0
}

/// Setext level of the line after the current one.
pub(super) fn next_line_setext_level(data: &[u8]) -> u32 {
    let mut i = 0;
    while i < data.len() && data[i] != b'\n' {
        i += 1;
    }
    i += 1;
    if i >= data.len() {
        return 0;
    }
    setext_level(&data[i..])
}

/// Blockquote prefix width: up to 3 spaces, `>`, one optional space.
pub(super) fn quote_prefix(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    if i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b' ' {
        i += 1;
    }

    if i < size && data[i] == b'>' {
        if i + 1 < size && data[i + 1] == b' ' {
            return i + 2;
        }
        return i + 1;
    }

    0
}

/// Indented-code prefix: exactly four leading spaces.
pub(super) fn code_prefix(data: &[u8]) -> usize {
    if data.len() > 3 && data[0] == b' ' && data[1] == b' ' && data[2] == b' ' && data[3] == b' ' {
        4
    } else {
        0
    }
}

/// Ordered-list prefix width (`digits. `), 0 when absent. A marker right
/// above a setext underline is not a list item.
pub(super) fn ordered_prefix(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    if i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b' ' {
        i += 1;
    }

    if i >= size || !data[i].is_ascii_digit() {
        return 0;
    }

    while i < size && data[i].is_ascii_digit() {
        i += 1;
    }

    if i + 1 >= size || data[i] != b'.' || data[i + 1] != b' ' {
        return 0;
    }

    if next_line_setext_level(&data[i..]) != 0 {
        return 0;
    }

    i + 2
}

/// Unordered-list prefix width (`* `, `+ `, `- `), 0 when absent.
pub(super) fn unordered_prefix(data: &[u8]) -> usize {
    let size = data.len();
    let mut i = 0;
    if i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b' ' {
        i += 1;
    }
    if i < size && data[i] == b' ' {
        i += 1;
    }

    if i + 1 >= size
        || (data[i] != b'*' && data[i] != b'+' && data[i] != b'-')
        || data[i + 1] != b' '
    {
        return 0;
    }

    if next_line_setext_level(&data[i..]) != 0 {
        return 0;
    }

    i + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hrule_needs_three_markers() {
        assert!(is_hrule(b"***\n"));
        assert!(is_hrule(b"- - -\n"));
        assert!(is_hrule(b"   ___\n"));
        assert!(!is_hrule(b"**\n"));
        assert!(!is_hrule(b"*-*\n"));
    }

    #[test]
    fn fence_with_word_info() {
        let (consumed, (s, e)) = is_code_fence(b"```rust\n").unwrap();
        assert_eq!(consumed, 8);
        assert_eq!((s, e), (3, 7));
    }

    #[test]
    fn fence_with_braced_info() {
        let (_, (s, e)) = is_code_fence(b"~~~ { .rust }\n").unwrap();
        assert_eq!(&b"~~~ { .rust }\n"[s..e], b".rust");
    }

    #[test]
    fn fence_rejects_trailing_garbage() {
        assert!(is_code_fence(b"```rust extra\n").is_none());
        assert!(is_code_fence(b"``\n").is_none());
    }

    #[test]
    fn setext_underlines() {
        assert_eq!(setext_level(b"===\n"), 1);
        assert_eq!(setext_level(b"---  \n"), 2);
        assert_eq!(setext_level(b"-=-\n"), 0);
    }

    #[test]
    fn quote_prefix_eats_one_space() {
        assert_eq!(quote_prefix(b"> quoted\n"), 2);
        assert_eq!(quote_prefix(b">quoted\n"), 1);
        assert_eq!(quote_prefix(b"   > q\n"), 5);
        assert_eq!(quote_prefix(b"    > q\n"), 0);
    }

    #[test]
    fn list_prefixes() {
        assert_eq!(unordered_prefix(b"* item\n"), 2);
        assert_eq!(unordered_prefix(b"  - item\n"), 4);
        assert_eq!(unordered_prefix(b"*item\n"), 0);
        assert_eq!(ordered_prefix(b"12. item\n"), 4);
        assert_eq!(ordered_prefix(b"12) item\n"), 0);
    }

    #[test]
    fn list_marker_above_setext_underline_is_text() {
        assert_eq!(unordered_prefix(b"- item\n===\n"), 0);
    }
}
