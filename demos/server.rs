//! Example server: reads connection settings and the session context from env
//! (`.env` honoured), then serves the method routes.
//!
//! With arguments it runs a single method instead and prints the JSON result:
//! `cargo run --example server -- read_inventory '{"limit": 5}'`

use commerce_agent_sdk::{app, load, load_from_path, AppState, ClientConfig, CommerceApi, Context, HttpTransport};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("commerce_agent_sdk=info".parse()?))
        .init();

    let client = ClientConfig::from_env()?;
    let project_key = client.project_key.clone();
    let transport = Arc::new(HttpTransport::new(client)?);
    let catalog = match std::env::var("CATALOG_PATH") {
        Ok(path) => load_from_path(path).await?,
        Err(_) => load()?,
    };
    let catalog = Arc::new(catalog);
    let context = Context::from_env()?;

    let mut args = std::env::args().skip(1);
    if let Some(method) = args.next() {
        let params = match args.next() {
            Some(raw) => serde_json::from_str(&raw)?,
            None => serde_json::Value::Null,
        };
        let api = CommerceApi::new(transport, catalog, project_key, context);
        println!("{}", api.run(&method, params).await?);
        return Ok(());
    }

    let state = AppState::new(transport, catalog, project_key, context);
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
