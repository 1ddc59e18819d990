use crate::{hostname::is_hostname, ip::is_ipv6};

/// A local part followed by `@` and a hostname or a bracketed IPv6 literal.
pub fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        let literal = literal.strip_prefix("IPv6:").unwrap_or(literal);
        return is_ipv6(literal);
    }
    is_hostname(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        assert!(is_email("joe.bloggs@example.com"));
        assert!(is_email("joe@[IPv6:::1]"));
        assert!(is_email("joe@[fe80::1]"));
    }

    #[test]
    fn test_invalid() {
        assert!(!is_email("2962"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("joe@"));
        assert!(!is_email("joe@-example.com"));
    }
}
