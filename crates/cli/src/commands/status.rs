//! `trialscout status` — Show configuration and session state.

use trialscout_config::AppConfig;
use trialscout_core::session::SessionStore;
use trialscout_session::FileSessionStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("TrialScout Status");
    println!("=================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Model:         {}", config.model.model);
    println!(
        "  API key:       {}",
        if config.validate().is_ok() {
            "configured"
        } else {
            "MISSING"
        }
    );
    println!(
        "  Trial API:     {}",
        config.sources.trial_api_base.as_deref().unwrap_or("(not configured)")
    );
    println!(
        "  Registry:      {}",
        config
            .sources
            .registry_base
            .as_deref()
            .unwrap_or("https://clinicaltrials.gov/api/v2")
    );
    println!("  Session slot:  {}", config.session_path().display());

    let store = FileSessionStore::new(config.session_path());
    match store.restore().await? {
        Some(_) => println!("  Conversation:  in progress (resume with `trialscout chat`)"),
        None => println!("  Conversation:  none"),
    }

    Ok(())
}
