// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use report_node::{api::ApiServer, config::ServiceConfig, storage::UserStore};
use std::env;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Report Node...\n");
    println!("📦 BUILD VERSION: {}", report_node::version::VERSION);
    println!("📅 Build Date: {}", report_node::version::BUILD_DATE);
    println!();

    let config = ServiceConfig::from_env();
    if let Err(e) = config.validate() {
        eprintln!("❌ Invalid configuration: {}", e);
        std::process::exit(1);
    }

    println!("🗄️  Opening user store...");
    let store = UserStore::new(config.store.clone());
    store.init_schema().await?;
    println!("✅ User store ready: {}", store.database_path().display());

    println!("🌐 Starting API server on {}...", config.api.listen_addr);
    let api_server = ApiServer::new(config.api.clone(), store).await?;
    let addr = api_server.local_addr();

    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 {}", report_node::version::get_version_string());
    println!("{}", separator);
    println!("Database:       {}", config.store.database_path.display());
    println!("Max upload:     {} bytes", config.api.max_upload_bytes);
    println!("\nAPI Endpoints:");
    println!("  Health:       http://{}/health", addr);
    println!("  Upload:       POST http://{}/upload-json", addr);
    println!("  Users:        http://{}/users", addr);
    println!("\nTest with curl:");
    println!("  curl -F 'file=@users.json' http://{}/upload-json", addr);
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    // Wait for shutdown signal
    signal::ctrl_c().await?;

    println!("\n⏹️  Shutting down...");
    api_server.shutdown().await;

    println!("👋 Goodbye!");
    Ok(())
}
