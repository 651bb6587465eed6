//! Field normalizers for CRM lead data.
//!
//! Every function here is total: empty or missing input yields an empty
//! string and nothing ever fails.

use serde_json::Value;

/// Legal-entity suffixes stripped from company names, checked in this order.
const COMPANY_SUFFIXES: [&str; 5] = [" LTDA", " S/A", " S.A.", " ME", " EPP"];

/// Read a JSON value as text for normalization.
///
/// Strings are taken as-is, numbers and booleans use their JSON rendering,
/// everything else (null, arrays, objects) reads as empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Trim and collapse every whitespace run into a single space.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case letters that follow a non-letter, lower-case the rest.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;

    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}

/// `"  joão   silva  "` → `"João Silva"`
pub fn clean_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    title_case(&collapse_whitespace(name))
}

/// Lowercase and trim. No syntax check.
pub fn clean_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keep ASCII digits only.
pub fn clean_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Collapse whitespace and drop one trailing legal suffix (`LTDA`, `S/A`,
/// `S.A.`, `ME`, `EPP`), matched case-insensitively.
pub fn clean_company_name(company: &str) -> String {
    let mut company = collapse_whitespace(company);

    for suffix in COMPANY_SUFFIXES {
        if let Some(start) = trailing_match(&company, suffix) {
            company.truncate(start);
            break;
        }
    }

    company.trim().to_string()
}

/// Byte offset where `suffix` starts if `text` ends with it, ignoring case.
fn trailing_match(text: &str, suffix: &str) -> Option<usize> {
    let len = suffix.chars().count();
    let (start, _) = text.char_indices().rev().nth(len.checked_sub(1)?)?;
    (text[start..].to_uppercase() == suffix).then_some(start)
}

pub fn clean_job_title(title: &str) -> String {
    title_case(title.trim())
}

pub fn normalize_address(address: &str) -> String {
    title_case(&collapse_whitespace(address))
}

/// Everything after the first `@`, or empty when there is none.
pub fn extract_email_domain(email: &str) -> String {
    email
        .split_once('@')
        .map(|(_, domain)| domain.to_string())
        .unwrap_or_default()
}

/// Render a digits-only phone as `(DD) NNNNN-NNNN` (mobile, 11 digits) or
/// `(DD) NNNN-NNNN` (landline, 10 digits). Other lengths pass through.
pub fn format_phone_brazilian(phone: &str) -> String {
    if !phone.is_ascii() {
        return phone.to_string();
    }

    match phone.len() {
        11 => format!("({}) {}-{}", &phone[..2], &phone[2..7], &phone[7..]),
        10 => format!("({}) {}-{}", &phone[..2], &phone[2..6], &phone[6..]),
        _ => phone.to_string(),
    }
}
