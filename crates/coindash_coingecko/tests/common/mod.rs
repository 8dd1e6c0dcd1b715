use axum::Router;
use coindash_coingecko::{CoinGeckoClient, CoinGeckoConfig};
use std::time::Duration;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub server crashed");
    });

    format!("http://{addr}")
}

pub fn client(base_url: &str, min_interval: Duration) -> CoinGeckoClient {
    CoinGeckoClient::builder()
        .config(CoinGeckoConfig {
            api_key: Some("test-key".to_string()),
            min_interval,
            ..CoinGeckoConfig::default()
        })
        .base_url(base_url)
        .build()
        .expect("Failed to build client")
}
