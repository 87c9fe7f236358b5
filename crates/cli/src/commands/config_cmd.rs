//! `swarmwright config`: configuration management commands.

use swarmwright_config::AppConfig;
use swarmwright_core::Role;

const REDACTED: &str = "[REDACTED]";

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:   {}", config.default_provider);
            println!("   Model:      {}", config.default_model);
            println!(
                "   Budgets:    {} revision(s), {} retry(ies) per call, {} ms backoff",
                config.orchestrator.max_swarm_retries,
                config.orchestrator.call_retries,
                config.orchestrator.backoff_base_ms
            );
            for role in Role::ALL {
                let provider = config
                    .agent(role)
                    .and_then(|a| a.provider.as_deref())
                    .unwrap_or(&config.default_provider);
                println!("   {:<11} {provider}", format!("{role}:"));
            }
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&redacted(config))?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

/// Non-fatal problems worth pointing out.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.has_api_key() {
        warnings.push("No API key set (set SWARMWRIGHT_API_KEY or OPENROUTER_API_KEY env var)".to_string());
    }

    if config.orchestrator.backoff_base_ms == 0 {
        warnings.push("orchestrator.backoff_base_ms is 0; failed calls retry immediately".to_string());
    }

    for (name, agent) in &config.agents {
        for fallback in &agent.fallback_providers {
            if !config.providers.contains_key(fallback)
                && swarmwright_providers::router::default_base_url(fallback).is_none()
            {
                warnings.push(format!("agents.{name} falls back to unknown provider '{fallback}'"));
            }
        }
    }

    warnings
}

/// Copy of `config` safe to print.
fn redacted(mut config: AppConfig) -> AppConfig {
    if config.api_key.is_some() {
        config.api_key = Some(REDACTED.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(REDACTED.into());
        }
    }
    config
}
