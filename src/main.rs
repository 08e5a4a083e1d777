use onlycoins::{logger, server, Config, ProviderClients};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    let (host, port) = config.bind_address();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);
    logger::log_config_info(&config);

    let clients = match ProviderClients::new(&config) {
        Ok(clients) => {
            log::info!("✅ Upstream clients initialized");
            clients
        }
        Err(e) => {
            log::error!("❌ Failed to initialize upstream clients: {}", e);
            return Err(e.into());
        }
    };

    let state = server::AppState::from_clients(&config, &clients);
    server::run(state, &host, port).await?;

    log::info!("👋 Server stopped");
    Ok(())
}
