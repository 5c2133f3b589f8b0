use std::net::SocketAddr;
use std::sync::Arc;

use airewardrop_auth::signature::parse_address;
use airewardrop_auth::{web_api, InMemoryDirectory};

#[tokio::main]
async fn main() {
    let addr: SocketAddr = std::env::var("AIREWARDROP_API_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| "127.0.0.1:8080".parse().expect("default addr"));

    // Comma-separated allow-list; admin ids are assigned in listing order.
    let admins = std::env::var("AIREWARDROP_ADMIN_WALLETS")
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .enumerate()
        .filter_map(|(i, raw)| {
            let address = parse_address(raw.trim()).ok()?;
            Some((i as u64 + 1, address))
        })
        .collect::<Vec<_>>();

    if admins.is_empty() {
        println!("warning: AIREWARDROP_ADMIN_WALLETS is empty; no wallet can log in");
    }

    let directory = Arc::new(InMemoryDirectory::with_admins(admins));
    let state = web_api::AppState::new(directory);

    println!("AIRewardrop admin API listening on http://{}", addr);
    web_api::run_http_server(addr, state).await;
}
