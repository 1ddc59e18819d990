/// RFC 1034 host name: dot separated labels of letters, digits and inner
/// hyphens, at most 63 bytes per label and 253 overall.
pub fn is_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    s.split('.').all(is_label)
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > 63 {
        return false;
    }
    let last = bytes.len() - 1;
    bytes.iter().enumerate().all(|(i, b)| {
        b.is_ascii_alphanumeric() || (*b == b'-' && i != 0 && i != last)
    })
}
