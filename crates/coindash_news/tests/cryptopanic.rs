use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use coindash_news::{NewsClient, NewsError, NewsProvider, NewsQuery};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error as _;
use tokio::net::TcpListener;

async fn posts(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    if query.get("auth").map(String::as_str) != Some("cp-key") {
        return StatusCode::FORBIDDEN.into_response();
    }
    assert_eq!(query.get("kind").map(String::as_str), Some("news"));
    assert_eq!(query.get("public").map(String::as_str), Some("true"));

    if query.get("currencies").map(String::as_str) == Some("BAD") {
        return "<html>maintenance</html>".into_response();
    }
    if query.get("currencies").map(String::as_str) == Some("SOL") {
        return Json(json!({"results": [
            {"id": 1, "title": "SOL steady", "metadata": {"image": ["a.png"]}},
            {"id": 2, "title": "SOL again", "source": "not-an-object"}
        ]}))
        .into_response();
    }

    let count = match query.get("currencies").map(String::as_str) {
        Some("BTC") => 30,
        Some("ETH") => 3,
        None => 5,
        Some(_) => 0,
    };
    let results: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("headline {i}"),
                "domain": "coindesk.com",
                "url": format!("https://cryptopanic.com/news/{i}"),
                "published_at": "2024-03-01T08:00:00Z"
            })
        })
        .collect();

    Json(json!({"count": count, "results": results})).into_response()
}

async fn search(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    assert_eq!(query.get("apikey").map(String::as_str), Some("kw-key"));
    let q = query.get("q").cloned().unwrap_or_default();
    Json(json!({"data": [{"uuid": format!("{q}-search"), "title": format!("about {q}")}]}))
}

/// Serves both providers; returns the base URL.
async fn serve() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    let router = Router::new()
        .route("/api/v1/posts/", get(posts))
        .route("/search", get(search));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server crashed");
    });
    format!("http://{addr}")
}

fn client_with_fallback(base_url: &str, key: &str, fallback: Option<&str>) -> NewsClient {
    NewsClient::builder()
        .provider(NewsProvider::CryptoPanic {
            auth: key.to_string(),
            fallback: fallback.map(str::to_string),
        })
        .cryptopanic_url(format!("{base_url}/api/v1/posts/"))
        .keyword_search_url(format!("{base_url}/search"))
        .build()
        .expect("Failed to build news client")
}

fn client(base_url: &str, key: &str) -> NewsClient {
    client_with_fallback(base_url, key, None)
}

#[tokio::test]
async fn fetch_symbol_news_capped() {
    let url = serve().await;
    let news = client(&url, "cp-key")
        .get_crypto_news(&NewsQuery::builder().coin_id("bitcoin").symbol("btc").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 12);
    assert_eq!(news[0].id, "0");
    assert_eq!(news[0].description, "coindesk.com");
    assert_eq!(news[0].source.as_deref(), Some("coindesk.com"));
    assert_eq!(news[0].published_at, "2024-03-01T08:00:00.000Z");
}

#[tokio::test]
async fn short_feeds_are_returned_whole() {
    let url = serve().await;
    let news = client(&url, "cp-key")
        .get_crypto_news(&NewsQuery::builder().symbol("eth").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 3);
}

#[tokio::test]
async fn without_symbol_reads_the_general_feed() {
    let url = serve().await;
    let news = client(&url, "cp-key")
        .get_crypto_news(&NewsQuery::default())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 5);
}

#[tokio::test]
async fn rejected_key_is_upstream_error() {
    let url = serve().await;
    let err = client(&url, "wrong-key")
        .get_crypto_news(&NewsQuery::builder().symbol("btc").build())
        .await
        .expect_err("Bad key must fail");

    assert!(matches!(err, NewsError::Upstream { status: 403, .. }));
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn odd_posts_are_kept() {
    let url = serve().await;
    let news = client(&url, "cp-key")
        .get_crypto_news(&NewsQuery::builder().symbol("sol").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 2);
    assert_eq!(news[0].title, "SOL steady");
    assert_eq!(news[0].thumbnail, None);
    assert_eq!(news[1].source, None);
}

#[tokio::test]
async fn without_symbol_uses_the_keyword_fallback() {
    let url = serve().await;
    let news = client_with_fallback(&url, "cp-key", Some("kw-key"))
        .get_crypto_news(&NewsQuery::builder().coin_id("solana").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 1);
    assert_eq!(news[0].id, "solana-search");
    assert_eq!(news[0].title, "about solana");
}

#[tokio::test]
async fn symbol_still_prefers_cryptopanic_with_a_fallback() {
    let url = serve().await;
    let news = client_with_fallback(&url, "cp-key", Some("kw-key"))
        .get_crypto_news(&NewsQuery::builder().coin_id("ethereum").symbol("eth").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 3);
}

#[tokio::test]
async fn unreachable_host_keeps_the_transport_error() {
    let err = client("http://127.0.0.1:9", "cp-key")
        .get_crypto_news(&NewsQuery::builder().symbol("btc").build())
        .await
        .expect_err("Nothing listens on port 9");

    assert!(matches!(err, NewsError::Fetch(_)));
    assert_eq!(err.status_code(), None);
    assert!(err.source().is_some());
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let url = serve().await;
    let err = client(&url, "cp-key")
        .get_crypto_news(&NewsQuery::builder().symbol("bad").build())
        .await
        .expect_err("HTML must not decode");

    assert!(matches!(err, NewsError::Decode(_)));
    assert!(!err.is_timeout());
}
