//! `swarmwright run`: drive one query through the swarm.

use std::path::Path;
use std::sync::Arc;
use swarmwright_agent::Orchestrator;
use swarmwright_config::AppConfig;
use swarmwright_core::EventBus;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

/// Providers served from the local machine, which need no API key.
const LOCAL_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

/// Pick the query from the positional argument or `--query-file`.
pub fn resolve_query(
    query: Option<String>,
    query_file: Option<&Path>,
) -> Result<String, Box<dyn std::error::Error>> {
    let query = match (query, query_file) {
        (Some(q), _) => q,
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read query file {}: {e}", path.display()))?,
        (None, None) => return Err("No query given. Pass QUERY or --query-file.".into()),
    };

    let query = query.trim();
    if query.is_empty() {
        return Err("Query is empty.".into());
    }
    Ok(query.to_string())
}

pub async fn run(query: &str, max_retries: Option<u32>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early and give a clear error
    if needs_api_key(&config) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    SWARMWRIGHT_API_KEY=sk-...      (generic)");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-... (recommended)");
        eprintln!("    OPENAI_API_KEY=sk-...           (for OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let roster = swarmwright_providers::build_roster(&config)?;
    debug!(?roster, "Roster ready");

    let bus = Arc::new(EventBus::default());
    let mut events = bus.subscribe();
    let event_log = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let line = serde_json::to_string(event.as_ref()).unwrap_or_default();
                    debug!(event = %line, "Swarm event");
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut orchestrator = Orchestrator::from_config(roster, &config.orchestrator).with_event_bus(bus);
    if let Some(retries) = max_retries {
        orchestrator = orchestrator.with_max_swarm_retries(retries);
    }

    let outcome = orchestrator.run_detailed(query).await;

    // Dropping the last sender closes the channel and ends the event log.
    drop(orchestrator);
    let _ = event_log.await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.answer);
    }

    Ok(())
}

fn needs_api_key(config: &AppConfig) -> bool {
    !config.has_api_key() && !LOCAL_PROVIDERS.contains(&config.default_provider.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn positional_query_is_trimmed() {
        let query = resolve_query(Some("  Explain borrowing \n".into()), None).unwrap();
        assert_eq!(query, "Explain borrowing");
    }

    #[test]
    fn query_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Compare tokio and async-std").unwrap();

        let query = resolve_query(None, Some(file.path())).unwrap();
        assert_eq!(query, "Compare tokio and async-std");
    }

    #[test]
    fn missing_query_file_is_an_error() {
        let err = resolve_query(None, Some(Path::new("/nonexistent/query.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read query file"));
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(resolve_query(Some("   ".into()), None).is_err());
        assert!(resolve_query(None, None).is_err());
    }

    #[test]
    fn local_providers_need_no_key() {
        let mut config = AppConfig::default();
        assert!(needs_api_key(&config));

        config.default_provider = "ollama".into();
        assert!(!needs_api_key(&config));

        config.default_provider = "openai".into();
        config.api_key = Some("sk-test".into());
        assert!(!needs_api_key(&config));
    }
}
