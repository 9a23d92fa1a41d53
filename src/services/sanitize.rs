//! HTML sanitization for user-supplied text
//!
//! Article titles, article content and comment text are stored as submitted
//! and filtered on the way out. The filter keeps a small allow-list of
//! formatting tags, strips every attribute that is not explicitly allowed
//! (which removes `on*` event handlers), drops `href`/`src` values with an
//! unsafe scheme, and escapes everything else that looks like markup.
//! Allowed tags are kept balanced: a closing tag with no open counterpart is
//! escaped, and tags still open at the end of the text are closed.
//!
//! ```ignore
//! use blogful::services::sanitize::sanitize_html;
//!
//! assert_eq!(
//!     sanitize_html(r#"<script>alert("xss");</script>"#),
//!     r#"&lt;script&gt;alert("xss");&lt;/script&gt;"#,
//! );
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A start or end tag at the beginning of the haystack. The name must be
/// followed by whitespace, `/` or `>`; attributes may not contain `<` or `>`.
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)([\s/][^<>]*)?>").expect("tag pattern is valid")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .expect("attribute pattern is valid")
});

/// Attributes allowed on each allowed tag; `None` means the tag is escaped
fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    match tag {
        "a" => Some(&["href", "title", "target"]),
        "img" => Some(&["src", "alt", "title", "width", "height"]),
        "abbr" => Some(&["title"]),
        "blockquote" | "q" => Some(&["cite"]),
        "td" | "th" => Some(&["colspan", "rowspan"]),
        "b" | "br" | "code" | "del" | "div" | "em" | "h1" | "h2" | "h3" | "h4" | "h5"
        | "h6" | "hr" | "i" | "ins" | "li" | "ol" | "p" | "pre" | "s" | "small" | "span"
        | "strong" | "sub" | "sup" | "u" | "ul" | "table" | "thead" | "tbody" | "tr"
        | "caption" => Some(&[]),
        _ => None,
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img")
}

/// Neutralize markup in untrusted text.
///
/// Plain text without `<` or `>` passes through unchanged, including quotes
/// and ampersands.
pub fn sanitize_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut open: Vec<String> = Vec::new();
    let mut rest = input;

    while let Some(pos) = rest.find(['<', '>']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('>') {
            out.push_str("&gt;");
            rest = &rest[1..];
            continue;
        }

        match TAG.captures(rest) {
            Some(caps) => {
                let matched_len = caps[0].len();
                render_tag(&caps, &mut open, &mut out);
                rest = &rest[matched_len..];
            }
            None => {
                out.push_str("&lt;");
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    for name in open.iter().rev() {
        push_end_tag(&mut out, name);
    }
    out
}

fn push_end_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn render_tag(caps: &Captures<'_>, open: &mut Vec<String>, out: &mut String) {
    let closing = !caps[1].is_empty();
    let name = caps[2].to_ascii_lowercase();

    let Some(allowed) = allowed_attributes(&name) else {
        out.push_str(&escape_markup(&caps[0]));
        return;
    };

    if closing {
        // Closing an outer tag also closes whatever is still open inside it
        match open.iter().rposition(|tag| *tag == name) {
            Some(idx) => {
                for inner in open.drain(idx..).rev() {
                    push_end_tag(out, &inner);
                }
            }
            None => out.push_str(&escape_markup(&caps[0])),
        }
        return;
    }

    let raw_attributes = caps.get(3).map_or("", |m| m.as_str());

    out.push('<');
    out.push_str(&name);
    for attr in ATTRIBUTE.captures_iter(raw_attributes) {
        let attr_name = attr[1].to_ascii_lowercase();
        if !allowed.contains(&attr_name.as_str()) {
            continue;
        }

        let value = attr
            .get(2)
            .or_else(|| attr.get(3))
            .or_else(|| attr.get(4))
            .map(|m| m.as_str());

        match value {
            Some(value) => {
                if (attr_name == "href" || attr_name == "src") && !is_safe_url(value) {
                    continue;
                }
                out.push(' ');
                out.push_str(&attr_name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            None => {
                out.push(' ');
                out.push_str(&attr_name);
            }
        }
    }
    if raw_attributes.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');

    if !is_void(&name) {
        open.push(name);
    }
}

/// Only http(s), mailto and scheme-less (relative) URLs are kept
fn is_safe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    // Entity-encoded colons would be decoded by the browser
    if normalized.contains("&#") || normalized.contains("&colon") {
        return false;
    }

    match normalized.find(':') {
        None => true,
        Some(idx) => {
            let scheme = &normalized[..idx];
            if scheme.contains(|c: char| matches!(c, '/' | '?' | '#')) {
                return true;
            }
            matches!(scheme, "http" | "https" | "mailto")
        }
    }
}

fn escape_markup(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(s: &str) -> String {
    escape_markup(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_script_tag_is_escaped_and_text_kept() {
        assert_eq!(
            sanitize_html(r#"Naughty naughty very naughty <script>alert("xss");</script>"#),
            r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
    }

    #[test]
    fn test_event_handler_is_stripped_from_allowed_tag() {
        let input = r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#;
        let expected = r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#;
        assert_eq!(sanitize_html(input), expected);
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let text = r#"Tom & Jerry said "hi" -- it's fine"#;
        assert_eq!(sanitize_html(text), text);
    }

    #[test]
    fn test_javascript_href_is_dropped() {
        assert_eq!(
            sanitize_html(r#"<a href="javascript:alert(1)" title="x">click</a>"#),
            r#"<a title="x">click</a>"#
        );
        assert_eq!(
            sanitize_html(r#"<a href=" JaVa	Script:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(
            sanitize_html(r#"<a href="javascript&#58;alert(1)">x</a>"#),
            "<a>x</a>"
        );
    }

    #[test]
    fn test_safe_urls_are_kept() {
        assert_eq!(
            sanitize_html(r#"<a href="/articles/1?x=a:b">x</a>"#),
            r#"<a href="/articles/1?x=a:b">x</a>"#
        );
        assert_eq!(
            sanitize_html("<a href='mailto:me@example.com'>mail</a>"),
            r#"<a href="mailto:me@example.com">mail</a>"#
        );
    }

    #[test]
    fn test_uppercase_and_self_closing_tags() {
        assert_eq!(sanitize_html("line<BR/>next"), "line<br />next");
        assert_eq!(
            sanitize_html("<SCRIPT SRC=//evil.js></SCRIPT>"),
            "&lt;SCRIPT SRC=//evil.js&gt;&lt;/SCRIPT&gt;"
        );
    }

    #[test]
    fn test_stray_angle_brackets_are_escaped() {
        assert_eq!(sanitize_html("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
        assert_eq!(sanitize_html("<<b>>"), "&lt;<b>&gt;</b>");
        assert_eq!(sanitize_html("<!-- note -->"), "&lt;!-- note --&gt;");
    }

    #[test]
    fn test_attribute_quotes_are_escaped() {
        assert_eq!(
            sanitize_html(r#"<img alt='say "cheese"' src=pic.png>"#),
            r#"<img alt="say &quot;cheese&quot;" src="pic.png">"#
        );
    }

    #[test]
    fn test_iframe_and_style_are_escaped() {
        assert_eq!(
            sanitize_html(r#"<iframe src="https://evil"></iframe>"#),
            r#"&lt;iframe src="https://evil"&gt;&lt;/iframe&gt;"#
        );
        assert_eq!(
            sanitize_html("<style>body{}</style>"),
            "&lt;style&gt;body{}&lt;/style&gt;"
        );
    }

    #[test]
    fn test_unmatched_closing_tags_are_escaped() {
        assert_eq!(
            sanitize_html("</div></div><p>Hi</p>"),
            "&lt;/div&gt;&lt;/div&gt;<p>Hi</p>"
        );
        assert_eq!(sanitize_html("<em>a</em></em>"), "<em>a</em>&lt;/em&gt;");
    }

    #[test]
    fn test_open_tags_are_closed() {
        assert_eq!(sanitize_html("<div><p>Hi"), "<div><p>Hi</p></div>");
        assert_eq!(
            sanitize_html("<div><b>bold</div> after"),
            "<div><b>bold</b></div> after"
        );
        assert_eq!(sanitize_html("a<br>b<img src=x.png>c"), "a<br>b<img src=\"x.png\">c");
    }

    proptest! {
        #[test]
        fn prop_output_never_contains_script_tag(input in ".{0,200}") {
            let out = sanitize_html(&input).to_ascii_lowercase();
            prop_assert!(!out.contains("<script"));
            prop_assert!(!out.contains("<iframe"));
        }

        #[test]
        fn prop_no_event_handler_survives(handler in "on[a-z]{1,12}", body in "[a-z()]{0,20}") {
            let input = format!(r#"<img src="a.png" {}="{}"><b {}={}>x</b>"#, handler, body, handler, body);
            let out = sanitize_html(&input);
            prop_assert!(!out.contains(&handler));
        }

        #[test]
        fn prop_closing_tags_never_outnumber_opening(input in "(</?(div|p|b|em|span)>|[a-z ]){0,40}") {
            let out = sanitize_html(&input);
            for tag in ["div", "p", "b", "em", "span"] {
                let opened = out.matches(&format!("<{}>", tag)).count();
                let closed = out.matches(&format!("</{}>", tag)).count();
                prop_assert_eq!(opened, closed);
            }
        }

        #[test]
        fn prop_text_without_brackets_is_identity(input in "[^<>]{0,200}") {
            prop_assert_eq!(sanitize_html(&input), input);
        }
    }
}
