//! Text helpers shared by the extraction and publishing stages.
//!
//! - Description cleanup ([`clean_text`])
//! - Digit-only number parsing for the result count header
//! - Capitalization for the document heading
//! - String truncation for logging remote error bodies

use once_cell::sync::Lazy;
use regex::Regex;

static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

/// Normalize scraped description text.
///
/// Collapses three or more consecutive newlines to two, collapses runs of
/// spaces to a single space and removes lines that are blank after trimming.
/// The result never contains an empty line, so the function is idempotent.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("a\n\n\n\nb"), "a\nb");
/// assert_eq!(clean_text("a    b"), "a b");
/// assert_eq!(clean_text(""), "");
/// ```
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = MULTI_NEWLINE.replace_all(text, "\n\n");
    let text = MULTI_SPACE.replace_all(&text, " ");
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect every ASCII digit in `text` and parse them as one number.
///
/// Header texts such as `"1 234 nabídek"` yield `1234`. Returns `None` when
/// there are no digits or the number overflows.
pub fn parse_digits(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Capitalize the first character of a string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("python"), "Python");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
