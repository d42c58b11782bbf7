//! Taskdeck Web Server
//!
//! A session-authenticated user and task-board application backed by a
//! flat-file JSON record store.

use clap::Parser;
use taskdeck::server::TaskdeckServerBuilder;
use taskdeck::{init_logging, WebConfig};

/// Taskdeck - user management and kanban task board
#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "A session-authenticated task board over flat-file JSON storage")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Directory holding the JSON table files
    #[arg(long)]
    data_dir: Option<String>,

    /// Base path under which the application is deployed
    #[arg(long)]
    base_path: Option<String>,

    /// Static files directory
    #[arg(long)]
    static_dir: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging first
    std::env::set_var(
        "RUST_LOG",
        format!("taskdeck={},tower_http=debug", args.log_level),
    );
    init_logging();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Create web configuration, command line overriding the environment
    let mut config = WebConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.dev {
        config.dev_mode = true;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(base_path) = args.base_path {
        config.base_path = base_path;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_dir = Some(static_dir);
    }

    // Print startup information
    println!("🚀 Starting Taskdeck");
    println!("📍 Server: http://{}:{}", config.host, config.port);
    println!("🗄️  Data directory: {}", config.data_dir);
    if !config.base_path.is_empty() {
        println!("📁 Base path: {}", config.base_path);
    }
    println!("🔧 Development mode: {}", config.dev_mode);

    // Build and start the server
    let server = match TaskdeckServerBuilder::new()
        .host(config.host.clone())
        .port(config.port)
        .dev_mode(config.dev_mode)
        .data_dir(config.data_dir.clone())
        .base_path(config.base_path.clone())
        .static_dir(config.static_dir.clone().unwrap_or_else(|| "static".to_string()))
        .build()
    {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server (this will block until shutdown)
    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed to start: {}", e);
        std::process::exit(1);
    }
}
