use std::sync::Arc;

use sitecast::config::{self, AppState, Config};
use sitecast::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    // Held until exit so the file writer flushes
    let _log_guard = logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(AppState::load(cfg).await?);
    logger::log_server_start(&addr, &state.config);
    logger::log_site_loaded(&state.site.current());

    server::signal::start_signal_handler(Arc::clone(&state))?;
    server::start_server_loop(listener, state).await?;

    Ok(())
}
