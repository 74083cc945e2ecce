//! herdlockd - A Keyed-Mutex Coordination Daemon
//!
//! This is the main entry point for the herdlockd server. It parses the
//! command line, sets up logging, binds the listening endpoint, and hands
//! everything to the event loop.

use anyhow::Context;
use herdlockd::config::{Config, Endpoint, DEFAULT_MAX_CONNECTIONS, DEFAULT_SOCKET_PATH};
use herdlockd::connection::Listener;
use herdlockd::Server;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Parse configuration from command-line arguments
fn parse_args() -> Config {
    let mut config = Config::default();
    let args: Vec<String> = std::env::args().collect();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--socket" | "-s" => {
                if i + 1 < args.len() {
                    config.endpoint = Endpoint::parse(&args[i + 1]);
                    i += 2;
                } else {
                    eprintln!("Error: --socket requires a value");
                    std::process::exit(1);
                }
            }
            "--maxconn" | "-m" => {
                if i + 1 < args.len() {
                    config.max_connections = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid maxconn value");
                        std::process::exit(1);
                    });
                    if config.max_connections == 0 {
                        eprintln!("Error: maxconn must be positive");
                        std::process::exit(1);
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --maxconn requires a value");
                    std::process::exit(1);
                }
            }
            "--force" | "-f" => {
                config.force_unlink = true;
                i += 1;
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-v" => {
                println!("herdlockd version {}", herdlockd::VERSION);
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    config
}

fn print_help() {
    println!(
        r#"
herdlockd - A Keyed-Mutex Coordination Daemon

herdlockd is a tiny daemon that acts as a mutex for a supplied key:
one client per key is elected owner, the rest wait until it releases.

USAGE:
    herdlockd [OPTIONS]

OPTIONS:
    -s, --socket <SOCKET>    Unix socket path or TCP port number
                             (default: {})
    -m, --maxconn <N>        Maximum concurrent connections (default: {})
    -f, --force              Remove a stale socket file before binding
    -v, --version            Print version information
        --help               Print this help message

EXAMPLES:
    herdlockd                          # Listen on {}
    herdlockd --socket 9201            # Listen on TCP port 9201
    herdlockd -s /run/locks.sock -f    # Unix socket, replacing a stale file
"#,
        DEFAULT_SOCKET_PATH, DEFAULT_MAX_CONNECTIONS, DEFAULT_SOCKET_PATH
    );
}

fn print_banner(config: &Config) {
    println!(
        r#"
herdlockd v{} - Keyed-Mutex Coordination Daemon
──────────────────────────────────────────────────
Endpoint:        {}
Max connections: {}

Use Ctrl+C to stop.
"#,
        herdlockd::VERSION,
        config.endpoint,
        config.max_connections
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = parse_args();

    // Set up logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Print the banner
    print_banner(&config);

    // Bind the listening endpoint; failure here is fatal.
    let listener = Listener::bind(&config.endpoint, config.force_unlink)
        .context("failed to open a listening socket")?;
    info!("Listening on {}", config.endpoint);

    let server = Server::new(listener, config.max_connections);

    // Run until interrupted. There is no draining: held locks are purely
    // in-memory and clients reconnect after a restart.
    tokio::select! {
        _ = server.run() => {}
        result = signal::ctrl_c() => {
            result.context("failed to install Ctrl+C handler")?;
            info!("Shutdown signal received, stopping server...");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
