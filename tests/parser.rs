use emberdown::{Callbacks, Extensions, Markdown, Renderer, render_html};

fn assert_html(md: &str, expected: &str) {
    assert_eq!(render_html(md.as_bytes(), &Extensions::default()), expected);
}

fn assert_html_ext(md: &str, exts: Extensions, expected: &str) {
    assert_eq!(render_html(md.as_bytes(), &exts), expected);
}

#[test]
fn parses_empty_input() {
    assert_html("", "");
}

#[test]
fn parses_atx_headers_h1_to_h6() {
    assert_html(
        "# h1\n## h2\n### h3\n#### h4\n##### h5\n###### h6",
        "<h1>h1</h1>\n<h2>h2</h2>\n<h3>h3</h3>\n<h4>h4</h4>\n<h5>h5</h5>\n<h6>h6</h6>\n",
    );
}

#[test]
fn atx_header_strips_trailing_hashes() {
    assert_html("# title ##", "<h1>title</h1>\n");
}

#[test]
fn atx_header_without_space_needs_no_space_by_default() {
    assert_html("#tight", "<h1>tight</h1>\n");
    assert_html_ext(
        "#tight",
        Extensions {
            space_headers: true,
            ..Default::default()
        },
        "<p>#tight</p>\n",
    );
}

#[test]
fn parses_setext_headers() {
    assert_html(
        "Heading one\n===========\n\nHeading two\n-----------",
        "<h1>Heading one</h1>\n<h2>Heading two</h2>\n",
    );
}

#[test]
fn setext_underline_ends_a_multiline_paragraph() {
    assert_html(
        "para line\nHeading\n=======",
        "<p>para line</p>\n<h1>Heading</h1>\n",
    );
}

#[test]
fn paragraph_runs_until_blank_line() {
    assert_html(
        "line one\nline two\n\nline three",
        "<p>line one\nline two</p>\n<p>line three</p>\n",
    );
}

#[test]
fn parses_horizontal_rules() {
    assert_html("a\n\n* * *\n\nb", "<p>a</p>\n<hr />\n<p>b</p>\n");
    assert_html("---", "<hr />\n");
}

#[test]
fn parses_blockquotes_with_lazy_continuation() {
    assert_html(
        "> quoted\n> more",
        "<blockquote>\n<p>quoted\nmore</p>\n</blockquote>\n",
    );
    assert_html(
        "> quoted\nlazy",
        "<blockquote>\n<p>quoted\nlazy</p>\n</blockquote>\n",
    );
}

#[test]
fn blockquote_ends_at_blank_line_before_plain_text() {
    assert_html(
        "> q\n\nafter",
        "<blockquote>\n<p>q</p>\n</blockquote>\n<p>after</p>\n",
    );
}

#[test]
fn nested_blockquotes() {
    assert_html(
        "> outer\n> > inner",
        "<blockquote>\n<p>outer</p>\n<blockquote>\n<p>inner</p>\n</blockquote>\n</blockquote>\n",
    );
}

#[test]
fn parses_indented_code_and_escapes_it() {
    assert_html(
        "    a < b\n    c & d",
        "<pre><code>a &lt; b\nc &amp; d\n</code></pre>\n",
    );
}

#[test]
fn indented_code_can_be_disabled() {
    assert_html_ext(
        "    x",
        Extensions {
            disable_indented_code: true,
            ..Default::default()
        },
        "<p>    x</p>\n",
    );
}

#[test]
fn tabs_expand_to_four_column_stops() {
    assert_html("\tcode", "<pre><code>code\n</code></pre>\n");
}

#[test]
fn parses_tight_lists() {
    assert_html(
        "- one\n- two\n\n1. first\n2. second",
        "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<ol>\n<li>first</li>\n<li>second</li>\n</ol>\n",
    );
}

#[test]
fn blank_line_upgrades_list_items_to_blocks() {
    assert_html(
        "- a\n\n- b",
        "<ul>\n<li><p>a</p></li>\n<li><p>b</p></li>\n</ul>\n",
    );
}

#[test]
fn switching_list_kind_starts_a_new_list() {
    assert_html(
        "- a\n\n1. b",
        "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n",
    );
}

#[test]
fn indented_marker_nests_a_sublist() {
    assert_html(
        "- a\n    - b",
        "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul></li>\n</ul>\n",
    );
}

#[test]
fn fence_inside_list_item_hides_markers_until_it_closes() {
    let exts = Extensions {
        fenced_code: true,
        ..Default::default()
    };
    let out = render_html(b"- a\n  ```\n  - not item\n  ```\n  b", &exts);
    assert!(out.contains("<code>"), "fence content went missing: {out}");
    assert!(
        !out.contains("<li>not item"),
        "marker inside fence became an item: {out}"
    );
}

#[test]
fn parses_inline_styles() {
    assert_html(
        "this is **strong** and *em* and `code`",
        "<p>this is <strong>strong</strong> and <em>em</em> and <code>code</code></p>\n",
    );
}

#[test]
fn parses_underscore_variants() {
    assert_html("__strong__ and _em_", "<p><strong>strong</strong> and <em>em</em></p>\n");
}

#[test]
fn triple_emphasis_uses_the_dedicated_callback() {
    assert_html("***x***", "<p><strong><em>x</em></strong></p>\n");
}

#[test]
fn emphasis_opener_cannot_precede_whitespace() {
    assert_html("a * b * c", "<p>a * b * c</p>\n");
    assert_html("*open", "<p>*open</p>\n");
}

#[test]
fn code_span_with_embedded_backticks() {
    assert_html("```a`` b``` x", "<p><code>a`` b</code> x</p>\n");
}

#[test]
fn code_span_trims_one_outer_space() {
    assert_html("` x `", "<p><code>x</code></p>\n");
}

#[test]
fn unclosed_code_span_is_literal() {
    assert_html("`open", "<p>`open</p>\n");
}

#[test]
fn hard_break_needs_two_trailing_spaces() {
    assert_html("foo  \nbar", "<p>foo<br />\nbar</p>\n");
    assert_html("foo \nbar", "<p>foo \nbar</p>\n");
}

#[test]
fn escapes_resolve_to_the_bare_character() {
    assert_html("\\*not em\\*", "<p>*not em*</p>\n");
    // every byte of the escape set comes back out bare
    for &b in b"\\`*_{}[]()#+-.!:|&<>^~" {
        let md = format!("x\\{}", b as char);
        let out = render_html(md.as_bytes(), &Extensions::default());
        let expected = match b {
            b'&' => "<p>x&amp;</p>\n".to_string(),
            b'<' => "<p>x&lt;</p>\n".to_string(),
            b'>' => "<p>x&gt;</p>\n".to_string(),
            _ => format!("<p>x{}</p>\n", b as char),
        };
        assert_eq!(out, expected, "escape of {:?}", b as char);
    }
}

#[test]
fn entities_pass_through_unparsed() {
    assert_html("AT&amp;T &#169; &x", "<p>AT&amp;T &#169; &amp;x</p>\n");
}

#[test]
fn inline_html_tags_pass_through() {
    assert_html("a <em>b</em> c", "<p>a <em>b</em> c</p>\n");
}

#[test]
fn parses_inline_links_and_titles() {
    assert_html("[t](/url)", "<p><a href=\"/url\">t</a></p>\n");
    assert_html(
        "[t](/url \"title\")",
        "<p><a href=\"/url\" title=\"title\">t</a></p>\n",
    );
}

#[test]
fn link_label_is_parsed_inline() {
    assert_html(
        "[**site**](http://e)",
        "<p><a href=\"http://e\"><strong>site</strong></a></p>\n",
    );
}

#[test]
fn link_destination_allows_balanced_parens_and_angles() {
    assert_html("[x](/a(b))", "<p><a href=\"/a(b)\">x</a></p>\n");
    assert_html("[x](</a b>)", "<p><a href=\"/a%20b\">x</a></p>\n");
}

#[test]
fn unclosed_link_is_literal() {
    assert_html("look [here](missing", "<p>look [here](missing</p>\n");
}

#[test]
fn empty_inline_destination_keeps_the_link() {
    assert_html("[x]()", "<p><a href=\"\">x</a></p>\n");
}

#[test]
fn reference_links_resolve_case_insensitively() {
    assert_html(
        "[A ref][ID]\n\n[id]: https://example.com \"Ref\"",
        "<p><a href=\"https://example.com\" title=\"Ref\">A ref</a></p>\n",
    );
}

#[test]
fn shortcut_and_empty_bracket_references() {
    assert_html(
        "[Shortcut]\n\n[shortcut]: https://s.test",
        "<p><a href=\"https://s.test\">Shortcut</a></p>\n",
    );
    assert_html(
        "[label][]\n\n[label]: /l",
        "<p><a href=\"/l\">label</a></p>\n",
    );
}

#[test]
fn undefined_reference_is_literal() {
    assert_html("[x][nope]", "<p>[x][nope]</p>\n");
}

#[test]
fn later_reference_definition_shadows_earlier() {
    assert_html(
        "[x][id]\n\n[id]: /first\n[id]: /second",
        "<p><a href=\"/second\">x</a></p>\n",
    );
}

#[test]
fn parses_images() {
    assert_html(
        "![Logo](https://img.test/l.png \"t\")",
        "<p><img src=\"https://img.test/l.png\" alt=\"Logo\" title=\"t\" /></p>\n",
    );
}

#[test]
fn link_href_is_html_escaped() {
    assert_html(
        "[x](https://e.com?a=1&b=2)",
        "<p><a href=\"https://e.com?a=1&amp;b=2\">x</a></p>\n",
    );
}

#[test]
fn angle_autolinks_work_without_the_extension() {
    assert_html(
        "<http://e.com> and <bob@mail.me>",
        "<p><a href=\"http://e.com\">http://e.com</a> and <a href=\"mailto:bob@mail.me\">bob@mail.me</a></p>\n",
    );
}

#[test]
fn bare_autolinks_need_the_extension() {
    assert_html("go http://a.io/x", "<p>go http://a.io/x</p>\n");

    let exts = Extensions {
        autolink: true,
        ..Default::default()
    };
    assert_html_ext(
        "go http://a.io/x now",
        exts,
        "<p>go <a href=\"http://a.io/x\">http://a.io/x</a> now</p>\n",
    );
    assert_html_ext(
        "see www.foo.org",
        exts,
        "<p>see <a href=\"http://www.foo.org\">www.foo.org</a></p>\n",
    );
    assert_html_ext(
        "hi bob@x.me",
        exts,
        "<p>hi <a href=\"mailto:bob@x.me\">bob@x.me</a></p>\n",
    );
}

#[test]
fn bare_autolink_drops_unbalanced_trailing_paren() {
    assert_html_ext(
        "(http://x.com/a)",
        Extensions {
            autolink: true,
            ..Default::default()
        },
        "<p>(<a href=\"http://x.com/a\">http://x.com/a</a>)</p>\n",
    );
}

#[test]
fn autolinking_is_off_inside_link_labels() {
    assert_html_ext(
        "[http://a.io](/x)",
        Extensions {
            autolink: true,
            ..Default::default()
        },
        "<p><a href=\"/x\">http://a.io</a></p>\n",
    );
}

#[test]
fn strikethrough_highlight_and_superscript_extensions() {
    assert_html_ext(
        "~~gone~~",
        Extensions {
            strikethrough: true,
            ..Default::default()
        },
        "<p><del>gone</del></p>\n",
    );
    assert_html_ext(
        "==marked==",
        Extensions {
            highlight: true,
            ..Default::default()
        },
        "<p><mark>marked</mark></p>\n",
    );
    assert_html_ext(
        "e^2 and x^(a b)",
        Extensions {
            superscript: true,
            ..Default::default()
        },
        "<p>e<sup>2</sup> and x<sup>a b</sup></p>\n",
    );
}

#[test]
fn single_tilde_is_not_strikethrough() {
    assert_html_ext(
        "~x~",
        Extensions {
            strikethrough: true,
            ..Default::default()
        },
        "<p>~x~</p>\n",
    );
}

#[test]
fn underline_extension_remaps_single_underscore() {
    assert_html_ext(
        "_u_ and *e*",
        Extensions {
            underline: true,
            ..Default::default()
        },
        "<p><u>u</u> and <em>e</em></p>\n",
    );
}

#[test]
fn quote_extension() {
    assert_html_ext(
        "she said \"hi\"",
        Extensions {
            quote: true,
            ..Default::default()
        },
        "<p>she said <q>hi</q></p>\n",
    );
}

#[test]
fn no_intra_emphasis_extension() {
    assert_html("in*word*em", "<p>in<em>word</em>em</p>\n");
    assert_html_ext(
        "in*word*em",
        Extensions {
            no_intra_emphasis: true,
            ..Default::default()
        },
        "<p>in*word*em</p>\n",
    );
}

#[test]
fn lax_spacing_lets_a_list_interrupt_a_paragraph() {
    assert_html("para\n- item", "<p>para\n- item</p>\n");
    assert_html_ext(
        "para\n- item",
        Extensions {
            lax_spacing: true,
            ..Default::default()
        },
        "<p>para</p>\n<ul>\n<li>item</li>\n</ul>\n",
    );
}

#[test]
fn fenced_code_keeps_raw_bytes_and_info_string() {
    assert_html_ext(
        "```rust\nfn main(){}\n```",
        Extensions {
            fenced_code: true,
            ..Default::default()
        },
        "<pre><code class=\"language-rust\">fn main(){}\n</code></pre>\n",
    );
    assert_html_ext(
        "~~~\n<raw> &amp;\n~~~",
        Extensions {
            fenced_code: true,
            ..Default::default()
        },
        "<pre><code>&lt;raw&gt; &amp;amp;\n</code></pre>\n",
    );
}

#[test]
fn table_with_alignment() {
    assert_html_ext(
        "| a | b |\n|---|:-:|\n| 1 | 2 |",
        Extensions {
            tables: true,
            ..Default::default()
        },
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th align=\"center\">b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>1</td>\n<td align=\"center\">2</td>\n</tr>\n</tbody>\n</table>\n",
    );
}

#[test]
fn table_short_rows_get_empty_cells() {
    assert_html_ext(
        "a | b\n--- | ---\nonly |",
        Extensions {
            tables: true,
            ..Default::default()
        },
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>only</td>\n<td></td>\n</tr>\n</tbody>\n</table>\n",
    );
}

#[test]
fn footnotes_render_in_first_use_order() {
    let exts = Extensions {
        footnotes: true,
        ..Default::default()
    };
    assert_html_ext(
        "see [^a]\n\n[^a]: note",
        exts,
        "<p>see <sup id=\"fnref:1\"><a href=\"#fn:1\" rel=\"footnote\">1</a></sup></p>\n\
         <div class=\"footnotes\">\n<hr />\n<ol>\n\
         <li id=\"fn:1\"><p>note&nbsp;<a href=\"#fnref:1\" rev=\"footnote\">&#8617;</a></p></li>\n\
         </ol>\n</div>\n",
    );
    // second and first swap ordinals when used in reverse order
    let out = render_html(b"[^b] then [^a]\n\n[^a]: first\n\n[^b]: second", &exts);
    assert!(out.contains("fnref:1\"><a href=\"#fn:1\" rel=\"footnote\">1"));
    assert!(out.contains("<li id=\"fn:1\"><p>second"));
    assert!(out.contains("<li id=\"fn:2\"><p>first"));
}

#[test]
fn unknown_footnote_stays_literal() {
    assert_html_ext(
        "see [^nope]",
        Extensions {
            footnotes: true,
            ..Default::default()
        },
        "<p>see [^nope]</p>\n",
    );
}

#[test]
fn raw_html_block_passes_through() {
    assert_html(
        "<div>\nx\n</div>\n\npara",
        "<div>\nx\n</div>\n\n<p>para</p>\n",
    );
    assert_html("<!-- note -->\n\np", "<!-- note -->\n<p>p</p>\n");
}

#[test]
fn unknown_tag_is_not_a_block() {
    assert_html("<span>x</span>", "<p><span>x</span></p>\n");
}

#[test]
fn document_of_only_definitions_renders_nothing() {
    assert_html("[a]: /one\n[b]: /two", "");
}

struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn callbacks(&self) -> Callbacks {
        Callbacks::none()
    }

    fn paragraph(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        ob.extend_from_slice(text);
        ob.push(b'\n');
    }
}

#[test]
fn absent_callbacks_leave_their_bytes_inactive() {
    let mut md = Markdown::new(PlainRenderer, Extensions::default());
    let mut out = Vec::new();
    md.render(b"a *b* `c` [d](/e)", &mut out);
    assert_eq!(out, b"a *b* `c` [d](/e)\n");
}

struct RefusingRenderer;

impl Renderer for RefusingRenderer {
    fn paragraph(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        ob.extend_from_slice(text);
        ob.push(b'\n');
    }
    // every span callback keeps its `false` default
}

#[test]
fn refused_constructs_fall_back_to_literal_text() {
    let mut md = Markdown::new(RefusingRenderer, Extensions::default());
    let mut out = Vec::new();
    md.render(b"say *em* and `code`", &mut out);
    assert_eq!(out, b"say *em* and `code`\n");
}

struct FramedRenderer;

impl Renderer for FramedRenderer {
    fn paragraph(&mut self, ob: &mut Vec<u8>, text: &[u8]) {
        ob.extend_from_slice(text);
    }
    fn doc_header(&mut self, ob: &mut Vec<u8>) {
        ob.extend_from_slice(b"[header]");
    }
    fn doc_footer(&mut self, ob: &mut Vec<u8>) {
        ob.extend_from_slice(b"[footer]");
    }
}

#[test]
fn doc_header_and_footer_fire_even_on_empty_input() {
    let mut md = Markdown::new(FramedRenderer, Extensions::default());
    let mut out = Vec::new();
    md.render(b"", &mut out);
    assert_eq!(out, b"[header][footer]");
}

#[test]
fn renders_arbitrary_byte_soup_without_panicking() {
    // xorshift over a markdown-flavored alphabet; the parser must survive
    // anything and keep its pools balanced (debug asserts run in tests)
    let alphabet: &[u8] = b"*_~=`[]()<>!#&\\^|\"@:w .-\n\t\rabc0123";
    let mut state = 0x2545F491u32;
    for round in 0..64 {
        let mut doc = Vec::with_capacity(512);
        for _ in 0..(64 + round * 8) {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            doc.push(alphabet[(state as usize) % alphabet.len()]);
        }
        let out = render_html(&doc, &Extensions::all());
        assert!(out.len() < doc.len() * 64 + 4096);
    }
}
