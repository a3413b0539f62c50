//! Albor Space UE Main Application
//! 
//! Starts the UE-side RLC dispatcher with its service loop.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use ue::{UeConfig, UeStack};

/// Albor Space UE
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ue.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error), overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,
    
    /// Statistics reporting period in seconds
    #[arg(long, default_value = "5")]
    stats_period_s: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    
    let config = if Path::new(&args.config).exists() {
        Some(UeConfig::from_toml_file(&args.config)?)
    } else {
        None
    };
    let log_directive = match (&args.log_level, &config) {
        (Some(level), _) => level.clone(),
        (None, Some(config)) => config.log.filter_directive(),
        (None, None) => "info".to_string(),
    };

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_directive));
    
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    info!("Starting Albor Space UE");
    let config = match config {
        Some(config) => {
            info!("Configuration file: {}", args.config);
            config
        }
        None => {
            warn!("Configuration file {} not found, using defaults", args.config);
            UeConfig::default()
        }
    };
    
    info!("RLC configuration:");
    info!("  BCCH queue capacity: {}", config.rlc.bcch_queue_capacity);
    info!("  Buffer size: {} bytes", config.rlc.buffer_size);
    info!("  Bearers: SRB0 (TM) + {} configured", config.bearers.len());
    
    let stack = UeStack::new(&config)?;
    let service_handle = stack.spawn_service_loop();
    info!("UE stack initialized successfully");
    
    let stats_period = tokio::time::Duration::from_secs(args.stats_period_s.max(1));
    let mut stats_interval = tokio::time::interval(stats_period);
    
    // Wait for shutdown signal, reporting statistics meanwhile
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            _ = stats_interval.tick() => {
                let stats = stack.stats();
                info!("RLC Statistics:");
                info!("  Active bearers: {}", stats.active_bearers);
                info!("  BCCH dropped: BCH {}, DLSCH {}",
                      stats.bcch_bch_dropped, stats.bcch_dlsch_dropped);
                info!("  Pool buffers allocated: {}, rejected: {}",
                      stats.pool.allocated, stats.pool.rejected);
            }
        }
    }
    
    // Shutdown
    info!("Shutting down UE");
    stack.shutdown().await;
    
    match tokio::time::timeout(tokio::time::Duration::from_secs(5), service_handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Service loop task failed: {}", e),
        Err(_) => warn!("Service loop did not stop in time"),
    }
    
    info!("UE shutdown complete");
    Ok(())
}
