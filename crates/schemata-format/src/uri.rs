use url::Url;

/// Absolute URI with a scheme.
pub fn is_uri(s: &str) -> bool {
    // `Url::parse` silently strips or encodes these, so they are rejected
    // up front.
    if s.chars().any(|c| c.is_whitespace() || c == '\\') {
        return false;
    }
    Url::parse(s).is_ok()
}

/// Absolute URI or relative reference whose path consists of RFC 3986
/// `pchar`s and `/`.
pub fn is_uri_reference(s: &str) -> bool {
    let Ok(base) = Url::parse("http://reference.invalid/") else {
        return false;
    };
    if base.join(s).is_err() {
        return false;
    }
    path_of(s).bytes().all(is_path_byte)
}

fn path_of(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    let mut rest = &reference[..end];
    if let Some(colon) = rest.find(':')
        && rest[..colon]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        && rest[..colon].starts_with(|c: char| c.is_ascii_alphabetic())
    {
        rest = &rest[colon + 1..];
    }
    if let Some(authority) = rest.strip_prefix("//") {
        rest = authority.find('/').map_or("", |slash| &authority[slash..]);
    }
    rest
}

fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'%'
                | b'/'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri() {
        assert!(is_uri("http://foo.bar/?baz=qux#quux"));
        assert!(is_uri("urn:isbn:0451450523"));
        assert!(!is_uri("//foo.bar/?baz=qux#quux"));
        assert!(!is_uri("\\\\WINDOWS\\fileshare"));
        assert!(!is_uri("abc"));
        assert!(!is_uri("http:// shouldfail.com"));
    }

    #[test]
    fn test_uri_reference() {
        assert!(is_uri_reference("http://foo.bar/?baz=qux#quux"));
        assert!(is_uri_reference("//foo.bar/?baz=qux#quux"));
        assert!(is_uri_reference("/abc"));
        assert!(is_uri_reference("#fragment"));
        assert!(is_uri_reference("definitions.json#/a"));
        assert!(!is_uri_reference("\\\\WINDOWS\\fileshare"));
        assert!(!is_uri_reference("a b"));
    }
}
