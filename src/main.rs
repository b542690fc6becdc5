// src/main.rs

//! The main entry point for the dispatchd server application.

use anyhow::Result;
use dispatchd::config::Config;
use dispatchd::server;
use std::env;
use tracing::{debug, error};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Collect command-line arguments to decide the execution mode.
    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("dispatchd version {VERSION}");
        return Ok(());
    }

    // Determine the configuration path.
    // It can be provided via a --config flag; otherwise, "config.toml" is
    // used when it exists, and built-in defaults otherwise.
    let explicit_config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    // Load the server configuration. An explicitly named file that fails to
    // load is fatal, as the operator clearly expected it to be used.
    let mut config = match explicit_config_path {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{path}\": {e}");
                std::process::exit(1);
            }
        },
        None if std::path::Path::new("config.toml").exists() => {
            match Config::from_file("config.toml") {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Failed to load configuration from \"config.toml\": {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Config::default(),
    };

    // Override port if provided as a command-line argument
    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        if let Some(port_str) = args.get(port_index + 1) {
            match port_str.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => {
                    eprintln!("Invalid port number: {port_str}");
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("--port flag requires a value");
            std::process::exit(1);
        }
    }

    // --debug raises the log level and makes the transport surface captured
    // dispatch failures in full; --no-cache disables response caching.
    if args.contains(&"--debug".to_string()) {
        config.debug = true;
    }
    if args.contains(&"--no-cache".to_string()) {
        config.cache.enabled = false;
    }

    // Setup logging. The RUST_LOG environment variable takes precedence over
    // the configured level; --debug bumps the default to debug.
    let default_level = if config.debug {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    debug!("Cache enabled: {}", config.cache.enabled);

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {}", e);
        return Err(e);
    }

    Ok(())
}
