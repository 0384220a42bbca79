//! `trialscout chat` — Interactive or single-message conversation.

use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use trialscout_agent::TrialAgent;
use trialscout_config::AppConfig;
use trialscout_core::cache::TrialCache;
use trialscout_core::trial::TrialView;
use trialscout_providers::ResponsesEndpoint;
use trialscout_sources::{CtGovRegistry, HttpTrialSource};
use trialscout_tools::{build_registry, SearchLimits, ToolDeps};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.validate().is_err() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export OPENAI_API_KEY='sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let agent = build_agent(&config).await?;

    if let Some(msg) = message {
        let reply = agent.chat(&msg).await?;
        print_reply(&reply.text, &reply.trials, reply.truncated);
    } else {
        interactive(&agent, &config).await?;
    }

    Ok(())
}

async fn build_agent(config: &AppConfig) -> Result<TrialAgent, Box<dyn std::error::Error>> {
    let api_key = config.model.api_key.clone().unwrap_or_default();
    let endpoint = Arc::new(ResponsesEndpoint::new(
        api_key,
        Some(config.model.base_url.as_str()),
    ));

    let trial_api_base = config
        .sources
        .trial_api_base
        .clone()
        .ok_or("sources.trial_api_base is not configured")?;
    let portal_base = config
        .sources
        .portal_base
        .clone()
        .unwrap_or_else(|| trial_api_base.clone());

    let deps = ToolDeps {
        source: Arc::new(HttpTrialSource::new(trial_api_base, portal_base)),
        registry: Arc::new(CtGovRegistry::new(config.sources.registry_base.as_deref())),
        cache: Arc::new(TrialCache::new()),
        profile: Arc::new(RwLock::new(None)),
    };
    let limits = SearchLimits {
        max_search_results: config.search.max_search_results,
        max_registry_results: config.search.max_registry_results,
        default_radius_miles: config.search.default_radius_miles,
    };
    let profile = deps.profile.clone();
    let tools = Arc::new(build_registry(&deps, limits));

    // Fail fast on a registry/schema mismatch before the first turn
    tools.validate_against(&tools.schemas())?;

    let session = Arc::new(trialscout_session::FileSessionStore::new(
        config.session_path(),
    ));

    let agent = TrialAgent::new(endpoint, config.model.model.clone(), tools, profile, session)
        .await?;
    Ok(agent)
}

async fn interactive(
    agent: &TrialAgent,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  TrialScout — clinical trial search assistant");
    println!();
    println!("  Model: {}", config.model.model);
    let state = agent.conversation_state().await;
    if state.active {
        println!("  Resuming your previous conversation.");
    }
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' to quit, 'reset' to start over.");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.eq_ignore_ascii_case("reset") {
            agent.reset_conversation().await?;
            println!("  Conversation reset.");
            continue;
        }

        match agent.chat(input).await {
            Ok(reply) => print_reply(&reply.text, &reply.trials, reply.truncated),
            Err(e) => eprintln!("  Error: {e}"),
        }
    }

    Ok(())
}

fn print_reply(text: &str, trials: &[TrialView], truncated: bool) {
    println!();
    println!("{text}");
    if !trials.is_empty() {
        println!();
        for trial in trials {
            match trial.distance_miles() {
                Some(d) => println!("  - {} ({d:.1} mi)", trial.id()),
                None => println!("  - {}", trial.id()),
            }
        }
    }
    if truncated {
        println!();
        println!("  (This answer may be incomplete; try a more specific question.)");
    }
    println!();
}
