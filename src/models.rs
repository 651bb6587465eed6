use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open lead record: arbitrary keys, insertion order preserved.
pub type LeadRecord = Map<String, Value>;

// ============ Cleaner Models ============

/// Operations offered by the CRM cleaner function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningOperation {
    CleanLead,
    NormalizeContact,
    ValidateCompany,
    Deduplicate,
}

impl CleaningOperation {
    /// Wire names of every operation, in dispatch order.
    pub const NAMES: &'static [&'static str] = &[
        "clean_lead",
        "normalize_contact",
        "validate_company",
        "deduplicate",
    ];

    pub const ALL: [CleaningOperation; 4] = [
        CleaningOperation::CleanLead,
        CleaningOperation::NormalizeContact,
        CleaningOperation::ValidateCompany,
        CleaningOperation::Deduplicate,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningOperation::CleanLead => "clean_lead",
            CleaningOperation::NormalizeContact => "normalize_contact",
            CleaningOperation::ValidateCompany => "validate_company",
            CleaningOperation::Deduplicate => "deduplicate",
        }
    }

    /// Human-readable description shown by the service info endpoint.
    pub fn description(&self) -> &'static str {
        match self {
            CleaningOperation::CleanLead => "Limpa e normaliza dados de lead",
            CleaningOperation::NormalizeContact => "Normaliza informações de contato",
            CleaningOperation::ValidateCompany => "Valida dados da empresa",
            CleaningOperation::Deduplicate => "Remove leads duplicados",
        }
    }
}

/// POST body of the cleaner function.
///
/// Only the payload matching `operation` is read; `null` payloads are
/// treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct CleanerRequest {
    /// Operation discriminator, `clean_lead` when absent.
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub lead_data: Option<LeadRecord>,
    #[serde(default)]
    pub contact_data: Option<LeadRecord>,
    #[serde(default)]
    pub company_data: Option<LeadRecord>,
    #[serde(default)]
    pub leads_list: Option<Vec<LeadRecord>>,
}

impl CleanerRequest {
    pub fn operation_name(&self) -> &str {
        self.operation.as_deref().unwrap_or("clean_lead")
    }
}

/// Cleaning rule reported in `_cleaning_rules_applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningRule {
    NormalizeName,
    CleanEmail,
    CleanPhone,
    CleanCompanyName,
}

/// Outcome of a company validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// False as soon as one error is recorded.
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Warnings never affect `is_valid`.
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Key that caused a record to be flagged as duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    Email,
    Telefone,
}

/// A record flagged during deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    /// Position of the record in the input list.
    pub index: usize,
    /// The record as received.
    pub lead: LeadRecord,
    pub duplicate_reason: Vec<DuplicateReason>,
}

/// Partition of a lead list into unique records and duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupResult {
    pub original_count: usize,
    pub unique_count: usize,
    pub duplicates_count: usize,
    pub unique_leads: Vec<LeadRecord>,
    pub duplicates_found: Vec<DuplicateEntry>,
}

// ============ Qualification Models ============

/// Pipeline status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Qualificado,
    EmAnalise,
    NaoQualificado,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Qualificado => "qualificado",
            LeadStatus::EmAnalise => "em_analise",
            LeadStatus::NaoQualificado => "nao_qualificado",
        }
    }
}

/// Weighted qualification criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Criterion {
    pub nome: &'static str,
    pub peso: u8,
}

/// Criteria table returned by `GET /qualificacao`.
#[derive(Debug, Clone, Serialize)]
pub struct CriteriaTable {
    pub criterios: Vec<Criterion>,
    pub pontuacao_minima: u8,
}

/// Scoring outcome for one lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualificationResult {
    /// Echo of the request's `lead_id` (null when absent).
    pub lead_id: Value,
    /// Sum of met criterion weights, capped at 100.
    pub pontuacao: u8,
    pub status: LeadStatus,
    pub criterios_atendidos: Vec<&'static str>,
    pub processado_em: String,
}

// ============ Dashboard Models ============

/// Aggregated lead counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_leads: usize,
    pub leads_qualificados: usize,
    pub leads_em_analise: usize,
    /// Mean score over all leads, 0 when there are none.
    pub pontuacao_media: f64,
    pub ultima_atualizacao: String,
}
