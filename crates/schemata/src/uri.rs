//! Schema locations and identifier keys.
//!
//! Identifiers are compared as strings. The key of a location always carries
//! a `#` and its fragment is percent-decoded, so `#/definitions/a%20b` and the
//! location built for the `a b` definition share one key.

use core::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use schemata_value::pointer;
use url::Url;

use crate::error::BuildError;

/// Characters encoded when a JSON Pointer token is placed in a fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Where a schema lives.
///
/// Documents built without a base URI only have relative locations; their
/// fragments still address nodes inside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Location {
    Absolute(Url),
    Relative(String),
}

impl Location {
    /// Resolves `reference` against `base` (RFC 3986 section 5).
    pub fn parse(reference: &str, base: Option<&Location>) -> Result<Self, BuildError> {
        let invalid = |source| BuildError::InvalidUri {
            uri: reference.to_string(),
            source,
        };
        match base {
            Some(Location::Absolute(base)) => {
                base.join(reference).map(Location::Absolute).map_err(invalid)
            }
            relative => match Url::parse(reference) {
                Ok(url) => Ok(Location::Absolute(url)),
                Err(url::ParseError::RelativeUrlWithoutBase) => {
                    Ok(Location::Relative(join_relative(relative, reference)))
                }
                Err(source) => Err(invalid(source)),
            },
        }
    }

    /// The percent-encoded fragment, without `#`.
    pub fn fragment(&self) -> &str {
        match self {
            Location::Absolute(url) => url.fragment().unwrap_or(""),
            Location::Relative(reference) => {
                reference.split_once('#').map_or("", |(_, fragment)| fragment)
            }
        }
    }

    /// The same document with another (already encoded) fragment.
    pub fn with_fragment(&self, fragment: &str) -> Location {
        match self {
            Location::Absolute(url) => {
                let mut url = url.clone();
                url.set_fragment(Some(fragment));
                Location::Absolute(url)
            }
            Location::Relative(reference) => {
                let document = reference.split_once('#').map_or(reference.as_str(), |(d, _)| d);
                Location::Relative(format!("{document}#{fragment}"))
            }
        }
    }

    /// Normalized key used by reference tables and the schema cache.
    pub fn key(&self) -> String {
        normalize(&self.to_string())
    }

    /// Key of the enclosing document, ending with `#`.
    pub fn root_key(&self) -> String {
        let key = self.key();
        split(&key).0.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Absolute(url) => write!(f, "{url}"),
            Location::Relative(reference) => f.write_str(reference),
        }
    }
}

fn join_relative(base: Option<&Location>, reference: &str) -> String {
    match (base, reference.strip_prefix('#')) {
        (Some(base), Some(fragment)) => base.with_fragment(fragment).to_string(),
        _ => reference.to_string(),
    }
}

/// Appends a `#` when missing and percent-decodes the fragment.
pub(crate) fn normalize(reference: &str) -> String {
    match reference.split_once('#') {
        Some((document, fragment)) => {
            let fragment = percent_decode_str(fragment).decode_utf8_lossy();
            format!("{document}#{fragment}")
        }
        None => format!("{reference}#"),
    }
}

/// Splits a normalized key into the document key (with `#`) and the
/// fragment.
pub(crate) fn split(key: &str) -> (&str, &str) {
    match key.find('#') {
        Some(at) => key.split_at(at + 1),
        None => (key, ""),
    }
}

/// Escapes a JSON Pointer token for use inside a URI fragment.
pub(crate) fn encode_token(token: &str) -> String {
    utf8_percent_encode(&pointer::escape(token), FRAGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_absolute_base() {
        let base = Location::parse("http://localhost:1234/root.json", None).unwrap();
        let location = Location::parse("folder/item.json#/a", Some(&base)).unwrap();
        assert_eq!(location.key(), "http://localhost:1234/folder/item.json#/a");
        assert_eq!(location.root_key(), "http://localhost:1234/folder/item.json#");
    }

    #[test]
    fn test_fragment_only_reference_keeps_document() {
        let base = Location::parse("http://x.test/s.json#/definitions", None).unwrap();
        let location = Location::parse("#/items", Some(&base)).unwrap();
        assert_eq!(location.key(), "http://x.test/s.json#/items");
    }

    #[test]
    fn test_relative_without_base() {
        let location = Location::parse("#/definitions/a", None).unwrap();
        assert_eq!(location, Location::Relative("#/definitions/a".to_string()));
        let nested = Location::parse("#foo", Some(&location)).unwrap();
        assert_eq!(nested.key(), "#foo");
    }

    #[test]
    fn test_keys_decode_fragments() {
        let encoded = format!("#/definitions/{}", encode_token("percent%field"));
        assert_eq!(encoded, "#/definitions/percent%25field");
        assert_eq!(normalize(&encoded), "#/definitions/percent%field");
        assert_eq!(
            normalize("#/definitions/percent%25field"),
            normalize(&encoded)
        );
        assert_eq!(encode_token("a/b~c d"), "a~1b~0c%20d");
    }

    #[test]
    fn test_normalize_appends_marker() {
        assert_eq!(normalize("http://x.test/a.json"), "http://x.test/a.json#");
        assert_eq!(split("http://x.test/a.json#/b"), ("http://x.test/a.json#", "/b"));
    }

    #[test]
    fn test_with_fragment_on_absolute() {
        let base = Location::parse("http://x.test/a.json", None).unwrap();
        let child = base.with_fragment("/properties/a%20b");
        assert_eq!(child.to_string(), "http://x.test/a.json#/properties/a%20b");
        assert_eq!(child.key(), "http://x.test/a.json#/properties/a b");
    }
}
