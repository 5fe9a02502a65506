//!
//! Small formatting helpers shared across logs and error messages.
//!

///
/// Ellipsize a string in the middle when it exceeds the `threshold`.
///
/// Produces: first `head` chars, a Unicode ellipsis '…', then last `tail` chars.
/// Returns the original string if it does not exceed the threshold, or if the
/// requested head/tail slice would not shorten it.
///
#[must_use]
pub fn ellipsize_middle(s: &str, threshold: usize, head: usize, tail: usize) -> String {
    let len = s.chars().count();
    if len > threshold && head + 1 + tail < len {
        let prefix: String = s.chars().take(head).collect();
        let suffix: String = s.chars().skip(len - tail).collect();

        format!("{prefix}…{suffix}")
    } else {
        s.to_string()
    }
}

/// Lowercase hex with a `0x` prefix.
#[must_use]
pub fn hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex into a fixed-width array, accepting an optional `0x`/`0X` prefix.
pub fn decode_hex_fixed<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let trimmed = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let mut out = [0u8; N];
    hex::decode_to_slice(trimmed, &mut out)?;

    Ok(out)
}

/// Truncate `s` to at most `max_bytes`, never splitting a UTF-8 character.
#[must_use]
pub fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

///
/// TESTS
///
