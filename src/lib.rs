//! Qualificadora Lead Functions Library
//!
//! Serverless-style functions for a lead-qualification workflow: lead CRUD,
//! qualification scoring, dashboard aggregation and CRM data cleaning,
//! plus the axum gateway that serves them over HTTP.
//!
//! # Modules
//!
//! - `api`: Function handlers and HTTP routes.
//! - `core`: Cleaning, validation, scoring and aggregation logic.
//! - `integrations`: Lead data source and the function envelope.
//! - `config`: Configuration management.
//! - `crm_cleaner`: Record cleaning, contact normalization, company validation, deduplication.
//! - `dashboard`: Lead counters.
//! - `errors`: Error handling types.
//! - `function_event`: Serverless request/response envelope and CORS profiles.
//! - `handlers`: The `main`, `app`, `dashboard` and `cleaner` functions.
//! - `lead_source`: Lead data source interface.
//! - `models`: Core data models.
//! - `normalizers`: Field normalizers.
//! - `qualification`: Weighted lead scoring.
//! - `routes`: HTTP gateway.
//! - `validators`: CNPJ and website checks.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod crm_cleaner;
pub mod dashboard;
pub mod errors;
pub mod function_event;
pub mod handlers;
pub mod lead_source;
pub mod models;
pub mod normalizers;
pub mod qualification;
pub mod routes;
pub mod validators;
