//! Phone number normalization.
//!
//! Every component that touches the cache converges on the key produced
//! here; the write path and the webhook invalidation path must agree, so
//! the function is total (never fails) and idempotent.

/// Normalize a raw phone string into the canonical cache key.
///
/// Rules, applied in order:
/// 1. strip every character except digits and a leading `+`
/// 2. starts with `+` → already canonical
/// 3. exactly 10 digits → North-American default, prepend `+1`
/// 4. starts with `1` and exactly 11 digits → prepend `+`
/// 5. starts with `00` → international dial prefix, replace with `+`
/// 6. otherwise prepend `+`
pub fn normalize(raw: &str) -> String {
    let mut digits = String::with_capacity(raw.len() + 2);
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && digits.is_empty()) {
            digits.push(c);
        }
    }

    if digits.starts_with('+') {
        return digits;
    }
    if digits.len() == 10 {
        return format!("+1{digits}");
    }
    if digits.starts_with('1') && digits.len() == 11 {
        return format!("+{digits}");
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return format!("+{rest}");
    }
    format!("+{digits}")
}
