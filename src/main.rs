use devserver::config::{self, AppState, Config};
use devserver::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path (extension optional), defaults to ./devserver.toml
    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    logger::init(&cfg)?;

    // Tokio runtime, sized by `server.workers` when set
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
    let state = Arc::new(AppState::new(&cfg)?);
    if state.scanner.watch_set().is_empty() {
        logger::log_warning("No watch extensions configured, reload check will always report 0");
    }
    if !state.root().is_dir() {
        logger::log_warning(&format!(
            "Serving root does not exist or is not a directory: {}",
            state.root().display()
        ));
    }

    let listener = server::create_listener(addr)?;
    logger::log_server_start(
        &addr,
        state.root(),
        &cfg,
        &state.scanner.watch_set().to_string(),
    );
    if cfg.livereload.check_path != config::LiveReloadConfig::default().check_path {
        logger::log_info(&format!(
            "Custom reload check path: {}",
            cfg.livereload.check_path
        ));
    }

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            server::shutdown_signal(),
        ))
        .await
}
