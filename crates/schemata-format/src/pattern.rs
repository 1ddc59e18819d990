use regex::Regex;

/// A regular expression the `regex` crate accepts.
pub fn is_regex(s: &str) -> bool {
    Regex::new(s).is_ok()
}
