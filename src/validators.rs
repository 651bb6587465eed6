use regex::Regex;
use std::sync::LazyLock;

/// Explicit `http(s)://` URL, or a bare domain-like token ending in a 2+ letter TLD.
static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[^\s/$.?#].[^\s]*$|^[^\s/$.?#].[^\s]*\.[a-z]{2,}$")
        .expect("website pattern is valid")
});

/// Structural CNPJ check: exactly 14 digits once formatting is stripped.
///
/// Check digits are not verified.
pub fn validate_cnpj(cnpj: &str) -> bool {
    cnpj.chars().filter(|c| c.is_ascii_digit()).count() == 14
}

/// Website plausibility check. Empty input is never valid.
pub fn validate_website(website: &str) -> bool {
    if website.is_empty() {
        return false;
    }

    let valid = WEBSITE_RE.is_match(website);
    if !valid {
        tracing::debug!("Website failed plausibility check: {}", website);
    }
    valid
}
