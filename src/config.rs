use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Deployment environment reported by the status endpoint.
    pub environment: String,
    /// Optional JSON file with the lead records served by the lead source.
    pub leads_file: Option<PathBuf>,
    pub body_limit_bytes: usize,
    /// Minimum score for a lead to be considered qualified (0-100).
    pub min_qualification_score: u8,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            environment: std::env::var("NETLIFY_ENV")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "development".to_string()),
            leads_file: std::env::var("LEADS_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            body_limit_bytes: std::env::var("BODY_LIMIT_BYTES")
                .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("BODY_LIMIT_BYTES must be a positive number"))
                .and_then(|limit: usize| {
                    if limit == 0 {
                        anyhow::bail!("BODY_LIMIT_BYTES cannot be zero");
                    }
                    Ok(limit)
                })?,
            min_qualification_score: std::env::var("QUALIFICATION_MIN_SCORE")
                .unwrap_or_else(|_| "70".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("QUALIFICATION_MIN_SCORE must be a number"))
                .and_then(|score: u8| {
                    if score > 100 {
                        anyhow::bail!("QUALIFICATION_MIN_SCORE must be between 0-100");
                    }
                    Ok(score)
                })?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Environment: {}", config.environment);
        if let Some(ref path) = config.leads_file {
            tracing::info!("Lead source file configured: {}", path.display());
        }
        tracing::debug!("Body limit: {} bytes", config.body_limit_bytes);
        tracing::debug!(
            "Qualification minimum score: {}",
            config.min_qualification_score
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
