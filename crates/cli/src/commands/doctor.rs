//! `docent doctor`: check configuration and the knowledge document.

use docent_config::AppConfig;
use docent_knowledge::{KnowledgeFetcher, resolve_download_url};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Docent Doctor: System Diagnostics");
    println!("=================================\n");

    let mut issues = 0;

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   Configuration valid");
            config
        }
        Err(e) => {
            println!("  [fail] Configuration invalid: {e}");
            println!();
            println!("  1 issue found. Fix the configuration and run doctor again.");
            return Ok(());
        }
    };

    println!("  [ok]   {} API credential(s) configured", config.api_keys.len());
    println!(
        "  [ok]   Model {} at {}",
        config.model.model, config.model.base_url
    );

    // Validation guarantees the URL is present.
    let url = config.knowledge_url.as_deref().unwrap_or_default();
    match resolve_download_url(url) {
        Ok(resolved) => {
            println!("  [ok]   Knowledge URL resolves to {resolved}");
            match KnowledgeFetcher::new()?.fetch(url).await {
                Ok(text) => println!("  [ok]   Knowledge document fetched ({} bytes)", text.len()),
                Err(e) => {
                    println!("  [fail] Knowledge document unavailable: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  [fail] Knowledge URL invalid: {e}");
            issues += 1;
        }
    }

    if config.notification_key.is_some() {
        println!("  [ok]   Pushbullet notifications enabled");
    } else {
        println!("  [warn] No PUSHBULLET_API_KEY set, notifications will only be logged");
    }

    println!(
        "  [ok]   Interactions logged to {}",
        config.interaction_log.path.display()
    );

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
