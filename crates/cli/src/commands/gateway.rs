//! `docent gateway`: start the HTTP chat server.

use docent_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Docent Gateway");
    println!("   Listening:   {}", config.bind_addr());
    println!("   Model:       {}", config.model.model);
    println!("   Credentials: {}", config.api_keys.len());

    docent_gateway::start(config).await?;

    Ok(())
}
