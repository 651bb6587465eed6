//! Invoke a function locally with an event read from a file or stdin.
//!
//! Usage: `invoke_function <main|app|dashboard|cleaner> [event.json]`
//!
//! An empty event is treated as `GET /`. The response envelope is printed
//! to stdout as pretty JSON; logs go to stderr.

use anyhow::Context;
use std::io::Read;

use qualificadora_api::config::Config;
use qualificadora_api::api::handlers::{self, AppState, FunctionName};
use qualificadora_api::integrations::function_event::FunctionEvent;
use qualificadora_api::integrations::lead_source::lead_source_from_config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let name = args.next().ok_or_else(|| {
        anyhow::anyhow!(
            "usage: invoke_function <{}> [event.json]",
            FunctionName::NAMES.join("|")
        )
    })?;
    let function = FunctionName::parse(&name)
        .ok_or_else(|| anyhow::anyhow!("Unknown function '{}'", name))?;

    let raw = match args.next() {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read event file {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read event from stdin")?;
            buffer
        }
    };

    let event = if raw.trim().is_empty() {
        FunctionEvent::new("GET", "/")
    } else {
        serde_json::from_str(&raw).context("Event must be a JSON object")?
    };

    let config = Config::from_env()?;
    let state = AppState {
        leads: lead_source_from_config(&config)?,
        config,
    };

    let response = handlers::invoke(function, &state, &event);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
