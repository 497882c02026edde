//! Host extraction and display-name shortening for visited URLs.

use url::Url;

/// Suffixes stripped by [`shorten`], applied in this order.
const TOP_LEVEL_DOMAINS: [&str; 10] = [
    ".com", ".edu", ".gov", ".org", ".net", ".int", ".mil", ".arpa", ".io", ".tv",
];

/// Longest `shortDomain` admitted into the dataset.
pub const MAX_SHORT_DOMAIN_LEN: usize = 30;

/// Host component of `url`, or an empty string when there is none.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_default()
}

/// Cosmetic short name for a host.
///
/// Removes the first `"www."` and then the first occurrence of each entry in
/// [`TOP_LEVEL_DOMAINS`], wherever it sits in the string. This is a substring
/// rule, not a suffix rule: `news.comcast.net` becomes `newscast`.
pub fn shorten(domain: &str) -> String {
    let mut short = domain.replacen("www.", "", 1);
    for tld in TOP_LEVEL_DOMAINS {
        short = short.replacen(tld, "", 1);
    }
    short
}

/// Whether a short name is displayable: non-empty and at most
/// [`MAX_SHORT_DOMAIN_LEN`] characters.
pub fn is_displayable(short_domain: &str) -> bool {
    let len = short_domain.chars().count();
    (1..=MAX_SHORT_DOMAIN_LEN).contains(&len)
}
