//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use almanac_core::{Engine, EngineConfig};
use almanac_server::ServerConfig;

use super::load_calendar;

pub async fn cmd_serve(
    config: EngineConfig,
    host: &str,
    port: u16,
    holidays_path: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    let calendar = load_calendar(holidays_path)?;

    println!("🚀 Starting Almanac API server...");
    println!("   Listening: http://{}:{}", host, port);
    match holidays_path {
        Some(path) => println!("   Holidays: {} ({} events)", path.display(), calendar.len()),
        None => println!("   Holidays: curated ({} events)", calendar.len()),
    }
    if config.cache.enabled {
        println!("   Insight cache: {}h TTL", config.cache.ttl_hours);
    } else {
        println!("   Insight cache: disabled");
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }

    let server_config = ServerConfig { allowed_origins };

    almanac_server::serve_with_config(Engine::new(config), calendar, host, port, server_config)
        .await
        .context("Server error")
}
