use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to cut text.
const ELLIPSIS: &str = "...";

/// Remove HTML tags, leaving the text between them.
///
/// A `<` without a closing `>` drops the rest of the input, matching how a
/// truncated feed summary usually ends mid-tag.
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    if !html.contains('<') {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Tags separate words: "<p>a</p><p>b</p>" is "a b"
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    Cow::Owned(out)
}

/// Decode the handful of entities feeds commonly leave in summaries.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    const ENTITIES: [(&str, &str); 8] = [
        ("&nbsp;", " "),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&#8217;", "\u{2019}"),
        ("&apos;", "'"),
        // Last so "&amp;lt;" decodes to "&lt;", not "<"
        ("&amp;", "&"),
    ];
    let mut out = s.to_string();
    for (entity, replacement) in ENTITIES {
        out = out.replace(entity, replacement);
    }
    Cow::Owned(out)
}

/// Collapse runs of whitespace and control characters into single spaces and
/// trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep at most `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        None => Cow::Borrowed(s),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS)),
    }
}

/// Turn a raw feed summary into plain display text.
pub fn clean_summary(raw: &str, max_chars: usize) -> String {
    let text = collapse_whitespace(&decode_entities(&strip_tags(raw)));
    truncate_chars(&text, max_chars).into_owned()
}

/// Fit a string into `max_width` terminal columns, ending in `...` when cut.
pub fn fit_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    let narrow = max_width < ELLIPSIS.len();
    let budget = if narrow {
        max_width
    } else {
        max_width - ELLIPSIS.len()
    };
    let mut width = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        cut = idx + c.len_utf8();
    }
    if narrow {
        return Cow::Owned(s[..cut].to_string());
    }
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}
