//! Bike Share Network Gateway Server
//!
//! This binary is the gateway server for the bike-share network.

use clap::Parser;
use log::{info, warn};

use bsn_gateway::common::{init_logger, GatewayError, Result};
use bsn_gateway::config::{GatewayConfig, ENV_PREFIX};
use bsn_gateway::gateway::start_gateway;
use bsn_gateway::network;
use bsn_gateway::{APP_NAME, VERSION};

use std::env;
use std::path::Path;

/// Bike Share Network Gateway: ledger front door and workflow executor
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Listen address
    #[clap(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level
    #[clap(long, default_value = "info")]
    log_level: String,

    /// Skip organization gates in the workflow engine
    #[clap(long)]
    dev_mode: bool,

    /// Load configuration from environment variables
    #[clap(long)]
    from_env: bool,

    /// Load configuration from a file
    #[clap(long)]
    config_file: Option<String>,

    /// Environment (development, testing, production)
    #[clap(long, default_value = "production")]
    environment: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    init_logger(&args.log_level);

    info!("Starting {} v{}", APP_NAME, VERSION);

    // Create default configuration
    let mut config = GatewayConfig::default();

    // Load environment-specific configuration if it exists
    let env_config_path = format!("config.{}.json", args.environment);
    if Path::new(&env_config_path).exists() {
        info!(
            "Loading environment-specific configuration from {}",
            env_config_path
        );
        let env_config = GatewayConfig::from_file(Path::new(&env_config_path))?;
        config = config.merge(env_config);
    }

    // Load from configuration file if specified
    if let Some(config_file) = args.config_file.clone() {
        if Path::new(&config_file).exists() {
            info!("Loading configuration from file: {}", config_file);
            let file_config = GatewayConfig::from_file(Path::new(&config_file))?;
            config = config.merge(file_config);
        } else {
            warn!("Configuration file not found: {}", config_file);
        }
    }

    // Load from environment variables if specified
    if args.from_env {
        info!("Loading configuration from environment variables");
        let get_env = |name: &str| -> Option<String> {
            let full_name = format!("{}{}", ENV_PREFIX, name);
            env::var(&full_name).ok()
        };

        let mut env_config = GatewayConfig::default();

        if let Some(listen) = get_env("LISTEN") {
            env_config.listen = listen
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid listen address: {}", e)))?;
        }

        if let Some(log_level) = get_env("LOG_LEVEL") {
            env_config.log_level = log_level;
        }

        if let Some(dev_mode) = get_env("DEV_MODE") {
            env_config.dev_mode = dev_mode.to_lowercase() == "true";
        }

        if let Some(ttl) = get_env("TOKEN_TTL_SECS") {
            env_config.token_ttl_secs = ttl
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid token TTL: {}", e)))?;
        }

        if let Some(env_name) = get_env("ENVIRONMENT") {
            env_config.environment = env_name;
        }

        config = config.merge(env_config);
    } else {
        // Load from command line arguments
        info!("Loading configuration from command line arguments");
        let cmd_config = GatewayConfig {
            listen: args
                .listen
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid listen address: {}", e)))?,
            log_level: args.log_level.clone(),
            dev_mode: args.dev_mode,
            environment: args.environment.clone(),
            ..Default::default()
        };

        config = config.merge(cmd_config);
    }

    // Validate the final configuration
    config.validate()?;

    info!("Configuration loaded successfully");
    info!("Listen address: {}", config.listen);
    info!(
        "Network {} / channel {} / chaincode {} {}",
        network::NETWORK_ID,
        network::CHANNEL_NAME,
        network::CHAINCODE_ID,
        network::CHAINCODE_VERSION
    );

    if config.dev_mode {
        warn!("Dev mode enabled: organization gates are disabled");
    }

    info!("Gateway service ready, press Ctrl+C to stop");

    // Run gateway service
    start_gateway(config)
        .await
        .map_err(|e| GatewayError::Other(e.to_string()))?;

    Ok(())
}
