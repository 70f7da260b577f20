//! Launchpad Web Server
//!
//! Backend for the Launchpad frontend: GitHub OAuth token exchange and
//! repository deployment analysis.

use anyhow::Context;
use clap::Parser;
use launchpad_core::{init_logging, LogFormat, ServiceConfig};
use launchpad_web::LaunchpadServerBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

/// Launchpad backend - GitHub OAuth proxy and repository analysis API
#[derive(Parser)]
#[command(name = "launchpad-web")]
#[command(about = "GitHub OAuth proxy and repository analysis API")]
#[command(version)]
struct Args {
    /// Server host to bind to (overrides BACKEND_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides BACKEND_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (compact, pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

/// Credential variables checked at startup
const REQUIRED_VARS: &[&str] = &["VITE_GITHUB_CLIENT_ID", "VITE_GITHUB_CLIENT_SECRET"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());

    // Override with command line arguments
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.logging = config.logging.with_level(&args.log_level);
    if let Some(format) = args.log_format.as_deref() {
        config.logging.format = parse_log_format(format)?;
    }

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let missing = config.missing_required();
    if !missing.is_empty() {
        eprintln!("ERROR: Missing required environment variables!");
        eprintln!("Required variables:");
        for var in REQUIRED_VARS {
            let status = if missing.contains(var) { "Missing" } else { "Set" };
            eprintln!("  - {}: {}", var, status);
        }
        eprintln!("\nPlease add these to your .env file and restart the server.");
        std::process::exit(1);
    }

    info!(
        client_id = %config.oauth.client_id_hint(),
        client_secret_set = config.oauth.client_secret.is_some(),
        redirect_uri = %config.oauth.redirect_uri,
        frontend_origin = %config.server.frontend_origin,
        gemini_configured = config.gemini.is_configured(),
        gemini_model = %config.gemini.model,
        "GitHub OAuth configuration"
    );

    let server = LaunchpadServerBuilder::new()
        .config(config)
        .build()
        .context("Failed to build server")?;

    server.start().await.context("Server failed")?;
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> anyhow::Result<ServiceConfig> {
    if let Some(path) = config_path {
        return ServiceConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    // Try to load from default locations
    let default_paths = [
        dirs::config_dir().map(|d| d.join("launchpad").join("config.toml")),
        dirs::home_dir().map(|d| d.join(".launchpad").join("config.toml")),
        Some(PathBuf::from("launchpad.toml")),
    ];

    for path in default_paths.iter().flatten() {
        if path.exists() {
            return ServiceConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()));
        }
    }

    Ok(ServiceConfig::default())
}

fn parse_log_format(value: &str) -> anyhow::Result<LogFormat> {
    match value.to_ascii_lowercase().as_str() {
        "compact" => Ok(LogFormat::Compact),
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => anyhow::bail!("Unknown log format '{}'", other),
    }
}
