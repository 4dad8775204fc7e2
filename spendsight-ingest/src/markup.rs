//! Minimal markup handling for ledger cell fragments.
//!
//! Cells arrive as small HTML snippets (a handful of flat `<div>`s, an
//! occasional link or decorative image). A real DOM is overkill here;
//! regex over the fragment text is enough, same as the statement-text
//! parsers elsewhere in this workspace.

use regex::Regex;

/// One labeled `<div>` fragment inside a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    /// Carries the cell's "payment"-style class (item name / payment method).
    pub is_payment: bool,
    /// Decorative purchase-help image wrapper; never a content fragment.
    pub is_decorative: bool,
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_tags(s: &str) -> String {
    let tag = Regex::new(r"(?s)<[^>]*>").expect("static pattern");
    collapse_ws(&tag.replace_all(s, ""))
}

/// Cell text with `<img>` and `<a>` subtrees removed first, remaining tags
/// stripped, and whitespace collapsed. Link text is deliberately excluded;
/// it is recovered separately via [`first_link_text`].
pub fn visible_text(fragment: &str) -> String {
    let img = Regex::new(r"(?is)<img[^>]*>").expect("static pattern");
    let link = Regex::new(r"(?is)<a\b[^>]*>.*?</a>").expect("static pattern");
    let without_img = img.replace_all(fragment, "");
    let without_links = link.replace_all(&without_img, "");
    strip_tags(&without_links)
}

/// Text of the first `<a>` element, if any (gift recipients render as links).
pub fn first_link_text(fragment: &str) -> Option<String> {
    let link = Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").expect("static pattern");
    link.captures(fragment).map(|caps| strip_tags(&caps[1]))
}

/// Labeled `<div>` fragments of a cell, in source order.
///
/// Non-nesting heuristic: ledger cells render their fragments flat, so a
/// lazy open/close match is sufficient. Fragment text keeps link text,
/// matching how the source labels item names inside payment fragments.
pub fn fragments(fragment: &str) -> Vec<Fragment> {
    let div = Regex::new(r#"(?is)<div\b([^>]*)>(.*?)</div>"#).expect("static pattern");
    let class_attr = Regex::new(r#"class\s*=\s*["']([^"']*)["']"#).expect("static pattern");

    div.captures_iter(fragment)
        .map(|caps| {
            let classes = class_attr
                .captures(&caps[1])
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            Fragment {
                text: strip_tags(&caps[2]),
                is_payment: classes.contains("wth_payment"),
                is_decorative: classes.contains("help_purchase_img"),
            }
        })
        .collect()
}
