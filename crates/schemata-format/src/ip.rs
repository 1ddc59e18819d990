use std::net::{Ipv4Addr, Ipv6Addr};

/// Dotted-quad IPv4 address.
pub fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// RFC 4291 IPv6 address.
pub fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4() {
        assert!(is_ipv4("192.168.0.1"));
        assert!(!is_ipv4("127.0.0.0.1"));
        assert!(!is_ipv4("256.256.256.256"));
        assert!(!is_ipv4("127.0"));
        assert!(!is_ipv4("0x7f000001"));
        assert!(!is_ipv4("::1"));
    }

    #[test]
    fn test_ipv6() {
        assert!(is_ipv6("::1"));
        assert!(is_ipv6("fe80::1:2"));
        assert!(!is_ipv6("12345::"));
        assert!(!is_ipv6("1:1:1:1:1:1:1:1:1:1:1:1:1:1:1:1"));
        assert!(!is_ipv6("::laptop"));
        assert!(!is_ipv6("127.0.0.1"));
    }
}
