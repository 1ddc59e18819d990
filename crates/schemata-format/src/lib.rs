//! Predicates for the string formats defined by JSON Schema draft-04.
//!
//! Every predicate takes the string under test and answers whether it is a
//! well-formed member of the format. Callers decide what happens to values
//! that are not strings.

mod datetime;
mod email;
mod hostname;
mod ip;
mod pattern;
mod uri;

pub use datetime::is_date_time;
pub use email::is_email;
pub use hostname::is_hostname;
pub use ip::{is_ipv4, is_ipv6};
pub use pattern::is_regex;
pub use uri::{is_uri, is_uri_reference};

/// Signature shared by all built-in format predicates.
pub type FormatFn = fn(&str) -> bool;

/// The built-in formats, keyed by their `format` keyword value.
pub const BUILTIN: &[(&str, FormatFn)] = &[
    ("date-time", is_date_time),
    ("email", is_email),
    ("hostname", is_hostname),
    ("ipv4", is_ipv4),
    ("ipv6", is_ipv6),
    ("regex", is_regex),
    ("uri", is_uri),
    ("uri-reference", is_uri_reference),
];

/// Looks up a built-in format by name.
pub fn builtin(name: &str) -> Option<FormatFn> {
    BUILTIN
        .iter()
        .find_map(|(candidate, f)| (*candidate == name).then_some(*f))
}
