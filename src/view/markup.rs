//! Minimal HTML scanning for the in-memory view.
//!
//! Fragments are self-authored and well-formed, so a tag scanner that pairs
//! opening and closing tags is enough: no entity decoding, no error recovery
//! beyond dropping unclosed elements.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Attribute marking an element whose text is a translation key.
pub const TEXT_KEY_ATTR: &str = "data-i18n";

/// Attribute marking an element whose inner HTML is a translation key.
pub const HTML_KEY_ATTR: &str = "data-i18n-html";

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();

/// A paired element found in markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    /// From `<` of the opening tag to `>` of the closing tag
    pub outer: Range<usize>,
    /// Between the opening and closing tags
    pub inner: Range<usize>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An element whose content comes from the translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub key: String,
    /// Inner HTML substitution instead of escaped text
    pub rich: bool,
    pub inner: Range<usize>,
}

/// All paired elements in document order.
pub fn elements(html: &str) -> Vec<Element> {
    let tag_regex = TAG_REGEX
        .get_or_init(|| Regex::new(r"<(/)?([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").unwrap());

    let mut open: Vec<(String, String, usize, usize)> = Vec::new();
    let mut found = Vec::new();

    for cap in tag_regex.captures_iter(html) {
        let Some(whole) = cap.get(0) else { continue };
        let name = cap[2].to_ascii_lowercase();
        let closing = cap.get(1).is_some();

        if !closing {
            let rest = &cap[3];
            if VOID_TAGS.contains(&name.as_str()) || rest.trim_end().ends_with('/') {
                continue;
            }
            open.push((name, rest.to_string(), whole.start(), whole.end()));
            continue;
        }

        let Some(pos) = open.iter().rposition(|(tag, ..)| *tag == name) else {
            continue;
        };
        // Anything opened after the match was never closed; drop it
        open.truncate(pos + 1);
        if let Some((tag, rest, start, inner_start)) = open.pop() {
            found.push(Element {
                tag,
                attrs: parse_attrs(&rest),
                outer: start..whole.end(),
                inner: inner_start..whole.start(),
            });
        }
    }

    found.sort_by_key(|el| el.outer.start);
    found
}

fn parse_attrs(text: &str) -> Vec<(String, String)> {
    let attr_regex = ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    });

    attr_regex
        .captures_iter(text)
        .map(|cap| {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            (cap[1].to_ascii_lowercase(), value.to_string())
        })
        .collect()
}

/// Translatable elements, outermost only.
///
/// A marked element nested inside another marked element is replaced along
/// with its parent's content, so it is not reported separately.
pub fn marked(html: &str) -> Vec<Marked> {
    let mut result: Vec<Marked> = Vec::new();
    for el in elements(html) {
        let (key, rich) = if let Some(key) = el.attr(HTML_KEY_ATTR) {
            (key, true)
        } else if let Some(key) = el.attr(TEXT_KEY_ATTR) {
            (key, false)
        } else {
            continue;
        };

        let nested = result
            .last()
            .is_some_and(|parent| parent.inner.start <= el.outer.start && el.outer.end <= parent.inner.end);
        if nested {
            continue;
        }

        result.push(Marked {
            key: key.to_string(),
            rich,
            inner: el.inner,
        });
    }
    result
}

/// Substitute every marked element's content using `lookup`.
pub fn localize(html: &str, lookup: &dyn Fn(&str) -> String) -> String {
    let mut out = html.to_string();
    for item in marked(html).into_iter().rev() {
        let value = lookup(&item.key);
        let replacement = if item.rich { value } else { escape_text(&value) };
        out.replace_range(item.inner, &replacement);
    }
    out
}

/// First element carrying `id="<id>"`.
pub fn find_by_id(html: &str, id: &str) -> Option<Element> {
    elements(html).into_iter().find(|el| el.attr("id") == Some(id))
}

/// Replace the content of the element with the given id.
pub fn replace_inner(html: &str, id: &str, content: &str) -> Option<String> {
    let el = find_by_id(html, id)?;
    let mut out = html.to_string();
    out.replace_range(el.inner, content);
    Some(out)
}

/// Remove the element with the given id, tags included.
pub fn remove_by_id(html: &str, id: &str) -> Option<String> {
    let el = find_by_id(html, id)?;
    let mut out = html.to_string();
    out.replace_range(el.outer, "");
    Some(out)
}

/// Escape text for insertion between tags.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_pairs_nested_tags() {
        let html = r#"<div id="a"><div id="b">x</div><br><img src="i.png"/></div>"#;
        let els = elements(html);
        assert_eq!(els.len(), 2);
        assert_eq!(els[0].attr("id"), Some("a"));
        assert_eq!(&html[els[1].inner.clone()], "x");
        assert_eq!(&html[els[0].outer.clone()], html);
    }

    #[test]
    fn test_elements_drops_unclosed() {
        let html = "<section><p>one<p>two</section>";
        let els = elements(html);
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].tag, "section");
    }

    #[test]
    fn test_parse_attrs_quotes() {
        let attrs = parse_attrs(r#" class="a b" data-x='y' DATA-I18N="k""#);
        assert_eq!(
            attrs,
            vec![
                ("class".to_string(), "a b".to_string()),
                ("data-x".to_string(), "y".to_string()),
                ("data-i18n".to_string(), "k".to_string()),
            ]
        );
    }

    #[test]
    fn test_marked_skips_nested() {
        let html = r#"<p data-i18n-html="intro">Hi <span data-i18n="name">x</span></p><h2 data-i18n="t">T</h2>"#;
        let items = marked(html);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "intro");
        assert!(items[0].rich);
        assert_eq!(items[1].key, "t");
        assert!(!items[1].rich);
    }

    #[test]
    fn test_localize_escapes_plain_text_only() {
        let html = r#"<h1 data-i18n="title">Old</h1><p data-i18n-html="body">Old</p>"#;
        let out = localize(html, &|key| match key {
            "title" => "Tom & Jerry".to_string(),
            _ => "<strong>New</strong>".to_string(),
        });
        assert_eq!(
            out,
            r#"<h1 data-i18n="title">Tom &amp; Jerry</h1><p data-i18n-html="body"><strong>New</strong></p>"#
        );
    }

    #[test]
    fn test_replace_and_remove_by_id() {
        let html = r#"<div id="slot-1"></div><p id="spinner">Loading</p>"#;
        let filled = replace_inner(html, "slot-1", "<img src=\"a.png\">").expect("slot exists");
        assert_eq!(filled, r#"<div id="slot-1"><img src="a.png"></div><p id="spinner">Loading</p>"#);

        let removed = remove_by_id(&filled, "spinner").expect("spinner exists");
        assert!(!removed.contains("spinner"));
        assert!(replace_inner(html, "missing", "x").is_none());
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r#"<a href="x">'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&lt;/a&gt;");
    }
}
