//! Lead data source.
//!
//! Functions read leads through [`LeadSource`] instead of generating them
//! inline. Nothing here writes back: creating or updating a lead only
//! builds the resulting record.

use anyhow::Context;
use chrono::Utc;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::LeadRecord;

/// Query interface over the stored leads.
pub trait LeadSource: Send + Sync {
    /// All leads, in source order.
    fn fetch_leads(&self) -> Result<Vec<LeadRecord>, AppError>;
}

/// Fixed list of leads held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadSource {
    leads: Vec<LeadRecord>,
}

impl InMemoryLeadSource {
    pub fn new(leads: Vec<LeadRecord>) -> Self {
        Self { leads }
    }

    /// Demo leads used when no leads file is configured.
    pub fn seeded() -> Self {
        let leads = [
            json!({
                "id": 1,
                "nome": "João Silva",
                "email": "joao@empresa.com",
                "telefone": "(11) 99999-9999",
                "empresa": "Empresa XYZ",
                "status": "qualificado",
                "pontuacao": 85
            }),
            json!({
                "id": 2,
                "nome": "Maria Santos",
                "email": "maria@empresa.com",
                "telefone": "(11) 88888-8888",
                "empresa": "Empresa ABC",
                "status": "em_analise",
                "pontuacao": 72
            }),
        ]
        .into_iter()
        .filter_map(|lead| match lead {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();

        Self { leads }
    }

    /// Load a JSON array of lead objects.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read leads file {}", path.display()))?;
        let leads: Vec<LeadRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Leads file {} must be a JSON array of objects", path.display()))?;

        tracing::info!("Loaded {} lead(s) from {}", leads.len(), path.display());
        Ok(Self { leads })
    }
}

impl LeadSource for InMemoryLeadSource {
    fn fetch_leads(&self) -> Result<Vec<LeadRecord>, AppError> {
        Ok(self.leads.clone())
    }
}

/// Lead source selected by the configuration: the leads file when one is
/// configured, the demo leads otherwise.
pub fn lead_source_from_config(config: &Config) -> anyhow::Result<Arc<dyn LeadSource>> {
    match &config.leads_file {
        Some(path) => Ok(Arc::new(InMemoryLeadSource::from_json_file(path)?)),
        None => {
            tracing::info!("No LEADS_FILE configured, serving demo leads");
            Ok(Arc::new(InMemoryLeadSource::seeded()))
        }
    }
}

/// Record for a newly created lead: `id` and `created_at` first, then the
/// submitted fields (which win on conflict).
pub fn new_lead_record(existing_count: usize, data: &LeadRecord) -> LeadRecord {
    let mut lead = LeadRecord::new();
    lead.insert("id".to_string(), json!(existing_count + 1));
    lead.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));
    for (key, value) in data {
        lead.insert(key.clone(), value.clone());
    }
    lead
}

/// Record for an updated lead: `updated_at` followed by the submitted fields.
pub fn updated_lead_record(data: &LeadRecord) -> LeadRecord {
    let mut lead = LeadRecord::new();
    lead.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
    for (key, value) in data {
        lead.insert(key.clone(), value.clone());
    }
    lead
}
