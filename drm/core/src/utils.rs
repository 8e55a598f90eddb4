/*!
    Small const-compatible byte helpers shared by the DRM crates.
*/

/**
    Const-compatible byte slice equality.
*/
pub const fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/**
    Const-compatible case-insensitive ASCII byte comparison.
*/
pub const fn eq_ignore_ascii_case(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i].to_ascii_lowercase() != b[i].to_ascii_lowercase() {
            return false;
        }
        i += 1;
    }
    true
}

/**
    Value of a single ASCII hex digit, or `None` for anything else.
*/
pub const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/**
    Returns `true` if every byte of `s` is an ASCII hex digit.
*/
pub const fn is_hex(s: &[u8]) -> bool {
    let mut i = 0;
    while i < s.len() {
        if hex_digit(s[i]).is_none() {
            return false;
        }
        i += 1;
    }
    true
}
