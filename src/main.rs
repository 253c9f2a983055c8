use tracing::info;

use termsync::{Config, WebServer};

const DEFAULT_CONFIG: &str = "config.toml";

fn usage() {
    eprintln!("Usage:");
    eprintln!("  termsync [config.toml]        run the server");
    eprintln!("  termsync hash-secret <secret> print an Argon2id hash for a credential");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("hash-secret") => {
            let Some(secret) = args.get(1) else {
                usage();
                std::process::exit(2);
            };
            match termsync::hash_secret(secret) {
                Ok(hash) => println!("{hash}"),
                Err(e) => {
                    eprintln!("Failed to hash secret: {e}");
                    std::process::exit(1);
                }
            }
            return;
        }
        Some("-h") | Some("--help") => {
            usage();
            return;
        }
        _ => {}
    }

    let config_path = args.first().map(String::as_str).unwrap_or(DEFAULT_CONFIG);

    // Load configuration
    let config = match Config::load_with_env(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    if let Err(e) = termsync::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        termsync::logging::init_console_only(&config.logging.level);
    }

    info!("termsync {}", env!("CARGO_PKG_VERSION"));

    let server = match WebServer::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Server configured on {}:{} (data root {})",
        config.server.host, config.server.port, config.storage.data_root
    );

    if let Err(e) = server.run().await {
        tracing::error!("Web server error: {e}");
        std::process::exit(1);
    }
}
