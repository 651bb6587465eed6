use chrono::Utc;
use serde_json::Value;

use crate::models::{DashboardSummary, LeadRecord, LeadStatus};

fn has_status(lead: &LeadRecord, status: LeadStatus) -> bool {
    lead.get("status").and_then(Value::as_str) == Some(status.as_str())
}

/// Aggregate lead counters and the mean score.
///
/// Leads without a numeric `pontuacao` count as 0 in the mean.
pub fn summarize(leads: &[LeadRecord]) -> DashboardSummary {
    let total_score: f64 = leads
        .iter()
        .map(|lead| {
            lead.get("pontuacao")
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        })
        .sum();

    let pontuacao_media = if leads.is_empty() {
        0.0
    } else {
        total_score / leads.len() as f64
    };

    DashboardSummary {
        total_leads: leads.len(),
        leads_qualificados: leads
            .iter()
            .filter(|lead| has_status(lead, LeadStatus::Qualificado))
            .count(),
        leads_em_analise: leads
            .iter()
            .filter(|lead| has_status(lead, LeadStatus::EmAnalise))
            .count(),
        pontuacao_media,
        ultima_atualizacao: Utc::now().to_rfc3339(),
    }
}
