use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

use upload_server::{config, logger, server};

/// Minimal HTTP server that stores PUT uploads under a document root
#[derive(Parser, Debug)]
#[command(name = "upload-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TCP port to listen on (overrides server.port)
    port: Option<u16>,

    /// Configuration file path, without extension
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut cfg = config::Config::load_from(&args.config)?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    logger::init(&cfg)?;

    // One connection at a time: a single-threaded runtime is all the loop needs
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(config::AppState::new(cfg));

    if !state.document_root.is_dir() {
        logger::log_warning(&format!(
            "Document root '{}' does not exist yet; it will be created by the first upload",
            state.document_root.display()
        ));
    }
    logger::log_server_start(&listener.local_addr()?, &state.config, &state.document_root);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    server::start_server_loop(listener, state, shutdown).await;
    logger::log_server_stopped();
    Ok(())
}
