//! CRM data cleaning: record cleaning, contact normalization, company
//! validation and lead deduplication.
//!
//! All operations are single deterministic passes over their input. The
//! input records are never mutated; the only impure step is reading the
//! wall clock for `_cleaned_at`.
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::models::{
    CleaningRule, DedupResult, DuplicateEntry, DuplicateReason, LeadRecord, ValidationResult,
};
use crate::normalizers::{
    clean_company_name, clean_email, clean_job_title, clean_name, clean_phone,
    extract_email_domain, format_phone_brazilian, normalize_address, value_text,
};
use crate::validators::{validate_cnpj, validate_website};

/// Recognized lead fields and their normalizer, in output order.
const LEAD_FIELDS: [(&str, fn(&str) -> String); 5] = [
    ("nome", clean_name),
    ("email", clean_email),
    ("telefone", clean_phone),
    ("empresa", clean_company_name),
    ("cargo", clean_job_title),
];

/// Fields that report a rule in `_cleaning_rules_applied`. `cargo` is
/// cleaned but not reported.
const REPORTED_RULES: [(&str, CleaningRule); 4] = [
    ("nome", CleaningRule::NormalizeName),
    ("email", CleaningRule::CleanEmail),
    ("telefone", CleaningRule::CleanPhone),
    ("empresa", CleaningRule::CleanCompanyName),
];

/// Normalize the recognized fields of a lead and copy every other key verbatim.
///
/// The output gets two extra keys: `_cleaned_at` (RFC 3339 timestamp) and
/// `_cleaning_rules_applied` (see [`applied_rules`]).
pub fn clean_lead_data(lead: &LeadRecord) -> LeadRecord {
    let mut cleaned = LeadRecord::new();

    for (field, normalize) in LEAD_FIELDS {
        if let Some(value) = lead.get(field) {
            cleaned.insert(field.to_string(), Value::String(normalize(&value_text(value))));
        }
    }

    for (key, value) in lead {
        if !cleaned.contains_key(key) {
            cleaned.insert(key.clone(), value.clone());
        }
    }

    cleaned.insert("_cleaned_at".to_string(), json!(Utc::now().to_rfc3339()));
    cleaned.insert(
        "_cleaning_rules_applied".to_string(),
        json!(applied_rules(lead)),
    );

    tracing::debug!("Cleaned lead with {} field(s)", lead.len());
    cleaned
}

/// Rules fired for `lead`, in the fixed order name, email, phone, company.
pub fn applied_rules(lead: &LeadRecord) -> Vec<CleaningRule> {
    REPORTED_RULES
        .iter()
        .filter(|(field, _)| lead.contains_key(*field))
        .map(|(_, rule)| *rule)
        .collect()
}

/// Normalized contact subset of a record.
///
/// Only `email` (+ `email_domain`), `telefone` (+ `telefone_formatado`) and
/// `endereco` are emitted; every other field is dropped.
pub fn normalize_contact_data(contact: &LeadRecord) -> LeadRecord {
    let mut normalized = LeadRecord::new();

    if let Some(email) = contact.get("email") {
        let email = clean_email(&value_text(email));
        let domain = extract_email_domain(&email);
        normalized.insert("email".to_string(), json!(email));
        normalized.insert("email_domain".to_string(), json!(domain));
    }

    if let Some(phone) = contact.get("telefone") {
        let phone = clean_phone(&value_text(phone));
        let formatted = format_phone_brazilian(&phone);
        normalized.insert("telefone".to_string(), json!(phone));
        normalized.insert("telefone_formatado".to_string(), json!(formatted));
    }

    if let Some(address) = contact.get("endereco") {
        normalized.insert(
            "endereco".to_string(),
            json!(normalize_address(&value_text(address))),
        );
    }

    normalized
}

/// Validate company name length, CNPJ and website.
///
/// Name and CNPJ problems are errors, a doubtful website is only a warning.
/// Missing fields are never reported.
pub fn validate_company_data(company: &LeadRecord) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if let Some(name) = company.get("nome") {
        if value_text(name).trim().chars().count() < 2 {
            result.add_error("Nome da empresa muito curto");
        }
    }

    if let Some(cnpj) = company.get("cnpj") {
        if !validate_cnpj(&value_text(cnpj)) {
            result.add_error("CNPJ inválido");
        }
    }

    if let Some(website) = company.get("website") {
        if !validate_website(&value_text(website)) {
            result.add_warning("Website pode estar incorreto");
        }
    }

    result
}

/// Split `leads` into unique records and duplicates in one forward pass.
///
/// A record is a duplicate when its normalized email or phone was already
/// seen on an earlier unique record. Empty keys never match, and duplicates
/// do not add their keys to the seen sets.
pub fn deduplicate_leads(leads: &[LeadRecord]) -> DedupResult {
    let mut unique_leads = Vec::new();
    let mut duplicates_found = Vec::new();
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut seen_phones: HashSet<String> = HashSet::new();

    for (index, lead) in leads.iter().enumerate() {
        let email = lead
            .get("email")
            .map(|v| clean_email(&value_text(v)))
            .unwrap_or_default();
        let phone = lead
            .get("telefone")
            .map(|v| clean_phone(&value_text(v)))
            .unwrap_or_default();

        let mut duplicate_reason = Vec::new();
        if !email.is_empty() && seen_emails.contains(&email) {
            duplicate_reason.push(DuplicateReason::Email);
        }
        if !phone.is_empty() && seen_phones.contains(&phone) {
            duplicate_reason.push(DuplicateReason::Telefone);
        }

        if duplicate_reason.is_empty() {
            unique_leads.push(lead.clone());
            if !email.is_empty() {
                seen_emails.insert(email);
            }
            if !phone.is_empty() {
                seen_phones.insert(phone);
            }
        } else {
            duplicates_found.push(DuplicateEntry {
                index,
                lead: lead.clone(),
                duplicate_reason,
            });
        }
    }

    tracing::info!(
        "Deduplication complete: {} received, {} unique, {} duplicates",
        leads.len(),
        unique_leads.len(),
        duplicates_found.len()
    );

    DedupResult {
        original_count: leads.len(),
        unique_count: unique_leads.len(),
        duplicates_count: duplicates_found.len(),
        unique_leads,
        duplicates_found,
    }
}
