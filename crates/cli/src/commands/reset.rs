//! `trialscout reset` — End the current conversation.

use trialscout_config::AppConfig;
use trialscout_core::session::SessionStore;
use trialscout_session::FileSessionStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = FileSessionStore::new(config.session_path());

    store.clear().await?;
    println!("Conversation reset. The next chat starts fresh.");
    Ok(())
}
