//! Lead qualification: weighted scoring against a fixed criteria table.
use chrono::Utc;
use serde_json::Value;

use crate::models::{CriteriaTable, Criterion, LeadRecord, LeadStatus, QualificationResult};
use crate::normalizers::value_text;

/// Budget above which the "Orçamento adequado" criterion is met.
const BUDGET_THRESHOLD: f64 = 10_000.0;

pub const MAX_SCORE: u8 = 100;

pub static CRITERIA: [Criterion; 5] = [
    Criterion {
        nome: "Empresa identificada",
        peso: 20,
    },
    Criterion {
        nome: "Cargo de liderança",
        peso: 25,
    },
    Criterion {
        nome: "Orçamento adequado",
        peso: 30,
    },
    Criterion {
        nome: "Necessidade urgente",
        peso: 15,
    },
    Criterion {
        nome: "Autoridade de decisão",
        peso: 10,
    },
];

/// JSON truthiness: null, false, 0, "", [] and {} are false.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Numeric budget from a number or a numeric string, 0 otherwise.
fn budget(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Which criteria of [`CRITERIA`] the lead meets, in table order.
pub fn met_criteria(lead: &LeadRecord) -> Vec<&'static Criterion> {
    let leadership_role = is_truthy(lead.get("cargo"))
        && lead
            .get("cargo")
            .map(|cargo| value_text(cargo).to_lowercase().contains("gerente"))
            .unwrap_or(false);

    let checks = [
        is_truthy(lead.get("empresa")),
        leadership_role,
        budget(lead.get("orcamento")) > BUDGET_THRESHOLD,
        is_truthy(lead.get("necessidade_urgente")),
        is_truthy(lead.get("autoridade_decisao")),
    ];

    CRITERIA
        .iter()
        .zip(checks)
        .filter_map(|(criterion, met)| met.then_some(criterion))
        .collect()
}

/// Sum of met criterion weights, capped at [`MAX_SCORE`].
pub fn calculate_score(lead: &LeadRecord) -> u8 {
    let total: u32 = met_criteria(lead)
        .iter()
        .map(|criterion| u32::from(criterion.peso))
        .sum();
    total.min(u32::from(MAX_SCORE)) as u8
}

/// Score a lead and classify it against `min_score`.
pub fn qualify_lead(lead: &LeadRecord, min_score: u8) -> QualificationResult {
    let met = met_criteria(lead);
    let pontuacao = calculate_score(lead);
    let status = if pontuacao >= min_score {
        LeadStatus::Qualificado
    } else {
        LeadStatus::NaoQualificado
    };

    let lead_id = lead.get("lead_id").cloned().unwrap_or(Value::Null);

    tracing::info!(
        "Lead {} scored {} ({})",
        lead_id,
        pontuacao,
        status.as_str()
    );

    QualificationResult {
        lead_id,
        pontuacao,
        status,
        criterios_atendidos: met.iter().map(|criterion| criterion.nome).collect(),
        processado_em: Utc::now().to_rfc3339(),
    }
}

pub fn criteria_table(min_score: u8) -> CriteriaTable {
    CriteriaTable {
        criterios: CRITERIA.to_vec(),
        pontuacao_minima: min_score,
    }
}
