use axum::extract::Query;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use coindash_news::{NewsClient, NewsError, NewsProvider, NewsQuery};
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::net::TcpListener;

fn articles(q: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "uuid": format!("{q}-{i}"),
                "title": format!("{q} story {i}"),
                "description": "summary",
                "url": format!("https://news.example/{q}/{i}"),
                "published_at": 1_700_000_000_000_i64,
                "source": "example.com"
            })
        })
        .collect()
}

async fn search(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    assert_eq!(query.get("apikey").map(String::as_str), Some("kw-key"));
    assert_eq!(query.get("size").map(String::as_str), Some("20"));
    assert_eq!(query.get("langs").map(String::as_str), Some("en"));
    assert!(query.contains_key("from") && query.contains_key("to"));

    let q = query.get("q").cloned().unwrap_or_default();
    let body = match q.as_str() {
        "bitcoin" => json!({"data": {"results": articles(&q, 45)}}),
        "eth" => json!({"results": articles(&q, 4)}),
        "crypto" => json!({"data": articles(&q, 2)}),
        "broken" => json!({"message": "unexpected"}),
        _ => return axum::http::StatusCode::BAD_GATEWAY.into_response(),
    };
    Json(body).into_response()
}

async fn client() -> NewsClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    let router = Router::new().route("/search", get(search));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server crashed");
    });

    NewsClient::builder()
        .provider(NewsProvider::KeywordSearch("kw-key".to_string()))
        .keyword_search_url(format!("http://{addr}/search"))
        .build()
        .expect("Failed to build news client")
}

#[tokio::test]
async fn coin_id_drives_the_query_and_cap() {
    let news = client()
        .await
        .get_crypto_news(&NewsQuery::builder().coin_id("bitcoin").symbol("btc").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 20);
    assert_eq!(news[0].id, "bitcoin-0");
    assert_eq!(news[0].published_at, "2023-11-14T22:13:20.000Z");
    assert_eq!(news[0].source.as_deref(), Some("example.com"));
}

#[tokio::test]
async fn symbol_is_the_second_choice() {
    let news = client()
        .await
        .get_crypto_news(&NewsQuery::builder().symbol("eth").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 4);
    assert_eq!(news[3].title, "eth story 3");
}

#[tokio::test]
async fn generic_query_without_hints() {
    let news = client()
        .await
        .get_crypto_news(&NewsQuery::default())
        .await
        .expect("Failed to fetch news");

    assert_eq!(news.len(), 2);
}

#[tokio::test]
async fn unknown_shape_is_empty_not_an_error() {
    let news = client()
        .await
        .get_crypto_news(&NewsQuery::builder().coin_id("broken").build())
        .await
        .expect("Unknown layout must not fail");

    assert!(news.is_empty());
}

#[tokio::test]
async fn non_2xx_is_upstream_error() {
    let err = client()
        .await
        .get_crypto_news(&NewsQuery::builder().coin_id("dogecoin").build())
        .await
        .expect_err("502 must fail");

    assert!(matches!(err, NewsError::Upstream { status: 502, .. }));
}
