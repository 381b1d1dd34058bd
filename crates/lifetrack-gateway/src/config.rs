//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;
use lifetrack_core::service::DEFAULT_SUSPENSION_DAYS;
use lifetrack_core::{ServiceConfig, StorageConfig};

/// LifeTrack HTTP/JSON Gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "lifetrack-gateway")]
#[command(about = "HTTP/JSON Gateway for LifeTrack")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Directory holding the LifeTrack database.
    #[arg(short, long, default_value = "./lifetrack-data")]
    pub data_dir: PathBuf,

    /// Page cache size in bytes.
    #[arg(long, default_value_t = 64 * 1024 * 1024)]
    pub cache_capacity: u64,

    /// Background flush interval (ms). 0 disables background flushing.
    #[arg(long, default_value_t = 500)]
    pub flush_every_ms: u64,

    /// Usernames to create or promote as administrators at startup.
    #[arg(long = "admin")]
    pub admins: Vec<String>,

    /// Length of a timed suspension in days.
    #[arg(long, default_value_t = DEFAULT_SUSPENSION_DAYS)]
    pub suspension_days: u32,

    /// UTC offset (hours, -12 to 14) defining the local day for log entries.
    #[arg(
        long,
        default_value_t = 4,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(-12..=14)
    )]
    pub utc_offset_hours: i32,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Database directory.
    pub data_dir: PathBuf,
    /// Page cache size in bytes.
    pub cache_capacity: u64,
    /// Background flush interval.
    pub flush_every_ms: Option<u64>,
    /// Administrators ensured at startup.
    pub admins: Vec<String>,
    /// Service settings.
    pub service: ServiceConfig,
}

impl GatewayConfig {
    /// Storage settings derived from this configuration.
    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(self.data_dir.clone())
            .with_cache_capacity(self.cache_capacity)
            .with_flush_every_ms(self.flush_every_ms)
    }
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            data_dir: args.data_dir.clone(),
            cache_capacity: args.cache_capacity,
            flush_every_ms: (args.flush_every_ms > 0).then_some(args.flush_every_ms),
            admins: args.admins.clone(),
            service: ServiceConfig::default()
                .with_suspension_days(args.suspension_days)
                .with_utc_offset_hours(args.utc_offset_hours),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("./lifetrack-data"),
            cache_capacity: 64 * 1024 * 1024,
            flush_every_ms: Some(500),
            admins: Vec::new(),
            service: ServiceConfig::default(),
        }
    }
}
