//! Server command implementation

use std::path::Path;

use anyhow::Result;

use trek_server::ServerConfig;

pub async fn cmd_serve(
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    cors_origins: Option<&str>,
) -> Result<()> {
    println!("🚀 Starting trek web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let api = super::api_from_env()?;
    println!("   Upstream API: {}", api.base_url());

    // Parse allowed CORS origins (comma-separated)
    let allowed_origins: Vec<String> = cors_origins
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let config = ServerConfig { allowed_origins };
    let static_dir = static_dir.and_then(|p| p.to_str());

    trek_server::serve(api, host, port, static_dir, config).await
}
