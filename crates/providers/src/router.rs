//! Roster building: resolves every role to a configured collaborator.
//!
//! For each role: the `[agents.<role>]` overrides win, then the named
//! provider's `[providers.<name>]` settings, then the global defaults.

use std::sync::Arc;
use std::time::Duration;
use swarmwright_config::{AgentConfig, AppConfig};
use swarmwright_core::{Collaborator, Error, Role, Roster};
use tracing::debug;

use crate::fallback::FallbackCollaborator;
use crate::openai_compat::ChatCollaborator;
use crate::prompts::default_prompt;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the full roster described by `config`.
pub fn build_roster(config: &AppConfig) -> Result<Roster, Error> {
    Roster::try_from_fn(|role| build_collaborator(config, role))
}

/// Build the collaborator for a single role.
pub fn build_collaborator(config: &AppConfig, role: Role) -> Result<Arc<dyn Collaborator>, Error> {
    let defaults = AgentConfig::default();
    let agent = config.agent(role).unwrap_or(&defaults);

    let provider_name = agent
        .provider
        .clone()
        .unwrap_or_else(|| config.default_provider.clone());

    let primary = chat_collaborator(config, agent, role, &provider_name, agent.model.as_deref())?;

    if agent.fallback_providers.is_empty() && agent.timeout_secs.is_none() {
        debug!(role = %role, provider = %provider_name, model = %primary.model(), "Built collaborator");
        return Ok(Arc::new(primary));
    }

    let timeout = agent
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    let mut chain = FallbackCollaborator::new(format!("{role}-chain")).add(Arc::new(primary), timeout);
    for fallback in &agent.fallback_providers {
        let collaborator = chat_collaborator(config, agent, role, fallback, None)?;
        chain = chain.add(Arc::new(collaborator), timeout);
    }

    debug!(role = %role, entries = chain.len(), "Built fallback chain");
    Ok(Arc::new(chain))
}

fn chat_collaborator(
    config: &AppConfig,
    agent: &AgentConfig,
    role: Role,
    provider_name: &str,
    model_override: Option<&str>,
) -> Result<ChatCollaborator, Error> {
    let provider = config.providers.get(provider_name);

    let api_key = provider
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    let base_url = match provider.and_then(|p| p.api_url.clone()) {
        Some(url) => url,
        None => default_base_url(provider_name).ok_or_else(|| Error::Config {
            message: format!(
                "provider '{provider_name}' for role '{role}' has no api_url and is not a well-known provider"
            ),
        })?,
    };

    let model = model_override
        .map(str::to_string)
        .or_else(|| provider.and_then(|p| p.default_model.clone()))
        .or_else(|| agent.model.clone())
        .unwrap_or_else(|| config.default_model.clone());

    let system_prompt = agent
        .system_prompt
        .clone()
        .unwrap_or_else(|| default_prompt(role).to_string());

    let mut collaborator = ChatCollaborator::new(format!("{provider_name}/{role}"), base_url, api_key, model)
        .with_system_prompt(system_prompt)
        .with_temperature(agent.temperature.unwrap_or(config.default_temperature))
        .with_max_tokens(config.default_max_tokens);

    if let Some(secs) = agent.timeout_secs {
        collaborator = collaborator.with_timeout(Duration::from_secs(secs));
    }

    Ok(collaborator)
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1",
        "openai" => "https://api.openai.com/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmwright_config::ProviderConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").unwrap().contains("openrouter.ai"));
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("mystery").is_none());
    }

    #[test]
    fn build_from_default_config() {
        let roster = build_roster(&AppConfig::default()).unwrap();
        assert_eq!(roster.planner.name(), "openrouter/planner");
        assert_eq!(roster.critic.name(), "openrouter/critic");
        assert_eq!(roster.reflector.name(), "openrouter/reflector");
    }

    #[test]
    fn agent_provider_override_applies_to_one_role() {
        let mut config = AppConfig::default();
        config.agents.insert(
            "researcher".into(),
            AgentConfig {
                provider: Some("ollama".into()),
                ..AgentConfig::default()
            },
        );
        let roster = build_roster(&config).unwrap();
        assert_eq!(roster.researcher.name(), "ollama/researcher");
        assert_eq!(roster.summarizer.name(), "openrouter/summarizer");
    }

    #[test]
    fn timeout_or_fallbacks_wrap_in_chain() {
        let mut config = AppConfig::default();
        config.agents.insert(
            "critic".into(),
            AgentConfig {
                timeout_secs: Some(15),
                fallback_providers: vec!["ollama".into()],
                ..AgentConfig::default()
            },
        );
        let roster = build_roster(&config).unwrap();
        assert_eq!(roster.critic.name(), "critic-chain");
        assert_eq!(roster.planner.name(), "openrouter/planner");
    }

    #[test]
    fn unknown_provider_without_url_is_config_error() {
        let config = AppConfig {
            default_provider: "mystery".into(),
            ..AppConfig::default()
        };
        match build_roster(&config) {
            Err(Error::Config { message }) => assert!(message.contains("mystery")),
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn custom_provider_with_url_is_accepted() {
        let mut config = AppConfig {
            default_provider: "internal".into(),
            ..AppConfig::default()
        };
        config.providers.insert(
            "internal".into(),
            ProviderConfig {
                api_url: Some("http://llm.internal:9000/v1".into()),
                ..ProviderConfig::default()
            },
        );
        let roster = build_roster(&config).unwrap();
        assert_eq!(roster.summarizer.name(), "internal/summarizer");
    }

    #[test]
    fn model_resolution_order() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "openrouter".into(),
            ProviderConfig {
                default_model: Some("provider-model".into()),
                ..ProviderConfig::default()
            },
        );
        let agent = AgentConfig {
            model: Some("agent-model".into()),
            ..AgentConfig::default()
        };

        let primary =
            chat_collaborator(&config, &agent, Role::Planner, "openrouter", agent.model.as_deref()).unwrap();
        assert_eq!(primary.model(), "agent-model");

        let fallback = chat_collaborator(&config, &agent, Role::Planner, "openrouter", None).unwrap();
        assert_eq!(fallback.model(), "provider-model");

        let bare = chat_collaborator(&config, &AgentConfig::default(), Role::Planner, "ollama", None).unwrap();
        assert_eq!(bare.model(), config.default_model);
    }
}
