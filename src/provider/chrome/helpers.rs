use std::convert::TryFrom;

use anyhow::{anyhow, Result};

/// Microseconds between 1601-01-01 (Chrome's epoch) and 1970-01-01.
const WEBKIT_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

/// Chrome timestamp (µs since 1601) to epoch ms. Zero stays zero.
pub fn webkit_to_epoch_ms(micros: i64) -> i64 {
    if micros == 0 {
        return 0;
    }
    (micros - WEBKIT_EPOCH_OFFSET_MICROS).div_euclid(1000)
}

pub fn epoch_ms_to_webkit(epoch_ms: i64) -> i64 {
    epoch_ms
        .saturating_mul(1000)
        .saturating_add(WEBKIT_EPOCH_OFFSET_MICROS)
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} out of range: {value}"))
}

/// Chrome stores "no referrer" as visit id 0.
pub fn referrer_id(from_visit: i64) -> Option<String> {
    (from_visit > 0).then(|| from_visit.to_string())
}

/// `LIKE` pattern matching `text` anywhere, with SQL wildcards escaped by `\`.
pub fn contains_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
