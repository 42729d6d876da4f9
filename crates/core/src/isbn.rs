//! ISBN shape validation. No checksum verification, only the 10/13 forms.

/// Strip the separators people type into ISBNs (hyphens and whitespace).
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Valid once separators are stripped: nine digits followed by a digit or
/// `X`, or exactly thirteen digits.
pub fn is_valid(raw: &str) -> bool {
    let cleaned = normalize(raw);
    let bytes = cleaned.as_bytes();
    match bytes.len() {
        10 => {
            bytes[..9].iter().all(u8::is_ascii_digit)
                && (bytes[9].is_ascii_digit() || bytes[9] == b'X')
        }
        13 => bytes.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}
