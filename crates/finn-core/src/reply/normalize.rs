//! Rewrites loosely formatted product enumerations into the canonical
//! `Here are some products:` layout the product-list parser expects.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use super::{PRODUCT_LINE_MARKER, PRODUCT_LIST_HEADER, SHOPPING_LIST_MARKER};

fn intro_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(we have|here are|the following|which would|do you want|would you like)")
            .expect("valid intro line regex")
    })
}

fn closing_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)would you like|which would you like|let me know|do you want more details")
            .expect("valid closing line regex")
    })
}

fn name_description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([^.]+?)[:：.\\\-]+ ?(.+)$").expect("valid name/description regex")
    })
}

fn list_opener_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(we have|here are|the following)").expect("valid list opener regex")
    })
}

/// Whether the classifier should run [`normalize_product_list`] on `text`.
///
/// Shopping lists also carry `• Product:` lines but have their own parser, so
/// they are never rewritten.
pub fn needs_normalizing(text: &str) -> bool {
    if text.contains(SHOPPING_LIST_MARKER) {
        return false;
    }

    list_opener_re().is_match(text.trim())
        || text.contains(PRODUCT_LINE_MARKER)
        || text.lines().any(|line| {
            let line = line.trim();
            line.strip_prefix('*')
                .is_some_and(|rest| rest.starts_with(char::is_whitespace))
        })
}

/// Normalize `text` when it needs it, borrowing it unchanged otherwise
pub fn normalize_for_display(text: &str) -> Cow<'_, str> {
    if needs_normalizing(text) {
        normalize_product_list(text)
    } else {
        Cow::Borrowed(text)
    }
}

/// Rewrite an unstructured product enumeration into canonical form.
///
/// Text that already starts with the header, or has no bullets to convert,
/// comes back borrowed and untouched.
pub fn normalize_product_list(text: &str) -> Cow<'_, str> {
    if text.starts_with(PRODUCT_LIST_HEADER)
        || !(text.contains("* ") || text.contains(PRODUCT_LINE_MARKER))
    {
        return Cow::Borrowed(text);
    }

    let mut out = String::from(PRODUCT_LIST_HEADER);

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || intro_line_re().is_match(trimmed)
            || closing_line_re().is_match(trimmed)
        {
            continue;
        }

        out.push('\n');
        out.push_str(&rewrite_line(line));
    }

    Cow::Owned(out)
}

fn rewrite_line(line: &str) -> String {
    if line.starts_with("* ") {
        let clean = strip_emphasis(line);
        if let Some(caps) = name_description_re().captures(&clean) {
            let name = caps[1].trim();
            let description = caps[2].trim();
            return format!("{PRODUCT_LINE_MARKER} {name}\n{description}");
        }
        return format!("{PRODUCT_LINE_MARKER} {}", clean.trim());
    }

    if let Some(rest) = line.strip_prefix("- ") {
        return format!("{PRODUCT_LINE_MARKER} {}", strip_emphasis(rest).trim());
    }

    line.to_string()
}

fn strip_emphasis(line: &str) -> String {
    line.replace('*', "")
}
