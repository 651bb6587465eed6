/// Property-based tests using proptest
/// Tests invariants of the normalizers and of the cleaner operations for all inputs
use proptest::prelude::*;
use qualificadora_api::core::crm_cleaner::{clean_lead_data, deduplicate_leads};
use qualificadora_api::core::models::LeadRecord;
use qualificadora_api::core::normalizers::{
    clean_company_name, clean_email, clean_name, clean_phone, extract_email_domain,
    format_phone_brazilian, normalize_address,
};
use qualificadora_api::core::qualification::calculate_score;
use serde_json::{json, Value};

fn lead_strategy() -> impl Strategy<Value = LeadRecord> {
    (
        proptest::option::of("[a-c]{0,2}@x\\.com"),
        proptest::option::of("[0-9]{0,2}"),
        "[a-z]{0,6}",
    )
        .prop_map(|(email, telefone, nome)| {
            let mut lead = LeadRecord::new();
            lead.insert("nome".to_string(), json!(nome));
            if let Some(email) = email {
                lead.insert("email".to_string(), json!(email));
            }
            if let Some(telefone) = telefone {
                lead.insert("telefone".to_string(), json!(telefone));
            }
            lead
        })
}

// Property: normalizers never panic
proptest! {
    #[test]
    fn normalizers_never_panic(input in "\\PC*") {
        let _ = clean_name(&input);
        let _ = clean_email(&input);
        let _ = clean_company_name(&input);
        let _ = normalize_address(&input);
        let _ = extract_email_domain(&input);
        let _ = format_phone_brazilian(&input);
    }

    #[test]
    fn clean_phone_keeps_only_digits(input in "\\PC*") {
        let phone = clean_phone(&input);
        prop_assert!(phone.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn clean_email_is_idempotent(input in "\\PC*") {
        let once = clean_email(&input);
        prop_assert_eq!(clean_email(&once), once);
    }

    #[test]
    fn formatted_phone_keeps_digits(digits in "[0-9]{10,11}") {
        let formatted = format_phone_brazilian(&digits);
        prop_assert_eq!(clean_phone(&formatted), digits);
    }
}

// Property: cleaner operations preserve their counting invariants
proptest! {
    #[test]
    fn dedup_counts_add_up(leads in proptest::collection::vec(lead_strategy(), 0..20)) {
        let result = deduplicate_leads(&leads);
        prop_assert_eq!(result.original_count, leads.len());
        prop_assert_eq!(result.unique_count + result.duplicates_count, result.original_count);
        prop_assert_eq!(result.unique_leads.len(), result.unique_count);
        prop_assert_eq!(result.duplicates_found.len(), result.duplicates_count);
    }

    #[test]
    fn dedup_preserves_order_and_records(leads in proptest::collection::vec(lead_strategy(), 0..20)) {
        let result = deduplicate_leads(&leads);

        let mut unique = result.unique_leads.iter();
        let mut duplicates = result.duplicates_found.iter().peekable();
        for (index, lead) in leads.iter().enumerate() {
            match duplicates.peek() {
                Some(entry) if entry.index == index => {
                    prop_assert_eq!(&entry.lead, lead);
                    prop_assert!(!entry.duplicate_reason.is_empty());
                    duplicates.next();
                }
                _ => {
                    prop_assert_eq!(unique.next(), Some(lead));
                }
            }
        }
        prop_assert!(unique.next().is_none());
        prop_assert!(duplicates.next().is_none());
    }

    #[test]
    fn clean_lead_preserves_unknown_keys(key in "[a-z]{3,8}", value in "\\PC*") {
        prop_assume!(!["nome", "email", "telefone", "empresa", "cargo"].contains(&key.as_str()));

        let mut lead = LeadRecord::new();
        lead.insert(key.clone(), Value::String(value.clone()));
        let cleaned = clean_lead_data(&lead);

        prop_assert_eq!(&cleaned[&key], &Value::String(value));
        prop_assert!(cleaned.contains_key("_cleaned_at"));
    }

    #[test]
    fn score_never_exceeds_maximum(
        orcamento in 0u64..100_000,
        flags in proptest::collection::vec(proptest::bool::ANY, 4)
    ) {
        let lead = json!({
            "empresa": if flags[0] { "Acme" } else { "" },
            "cargo": if flags[1] { "Gerente de Vendas" } else { "Analista" },
            "orcamento": orcamento,
            "necessidade_urgente": flags[2],
            "autoridade_decisao": flags[3],
        });
        let lead = lead.as_object().cloned().unwrap_or_default();
        prop_assert!(calculate_score(&lead) <= 100);
    }
}
