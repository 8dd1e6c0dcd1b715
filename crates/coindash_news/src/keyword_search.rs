use crate::date::normalize_value;
use crate::text;
use bon::Builder;
use chrono::{DateTime, Duration, Utc};
use coindash_shared_models::NewsItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BASE_URL: &str = "https://api.thenewsapi.net/crypto";
pub const MAX_ITEMS: usize = 20;
pub const LOOKBACK_DAYS: i64 = 7;
pub const DEFAULT_QUERY: &str = "crypto";

#[derive(Serialize, Debug, Builder)]
pub struct SearchParams {
    #[builder(into)]
    pub apikey: String,
    #[builder(into)]
    pub q: String,
    #[builder(into)]
    pub from: String,
    #[builder(into)]
    pub to: String,
    #[builder(default = MAX_ITEMS)]
    pub size: usize,
    #[builder(into, default = String::from("en"))]
    pub langs: String,
}

impl SearchParams {
    /// Trailing window ending at `now`, dates as `YYYY-MM-DD`.
    pub fn trailing_week(apikey: &str, q: &str, now: DateTime<Utc>) -> Self {
        let from = now - Duration::days(LOOKBACK_DAYS);
        SearchParams::builder()
            .apikey(apikey)
            .q(q)
            .from(from.format("%Y-%m-%d").to_string())
            .to(now.format("%Y-%m-%d").to_string())
            .build()
    }
}

/// One article under any of the field names seen across layouts.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Article {
    pub id: Option<Value>,
    pub uuid: Option<Value>,
    pub article_id: Option<Value>,
    pub slug: Option<Value>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub snippet: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub content: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub link: Option<String>,
    pub published_at: Option<Value>,
    pub published: Option<Value>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<Value>,
    pub date: Option<Value>,
    pub created_at: Option<Value>,
    pub source: Option<Value>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub source_id: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub image: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub thumbnail: Option<String>,
}

/// `source` is either a plain name or an object with `name`/`title`.
fn source_name(source: Option<&Value>) -> Option<String> {
    match source? {
        Value::Object(fields) => fields
            .get("name")
            .or_else(|| fields.get("title"))
            .and_then(text::value_to_string),
        other => text::value_to_string(other),
    }
}

impl Article {
    pub fn into_item(self) -> NewsItem {
        let published = [
            &self.published_at,
            &self.published,
            &self.pub_date,
            &self.date,
            &self.created_at,
        ]
        .into_iter()
        .find_map(|candidate| candidate.as_ref().filter(|v| !v.is_null()));

        NewsItem {
            id: text::first_of([
                self.id.as_ref().and_then(text::value_to_string),
                self.uuid.as_ref().and_then(text::value_to_string),
                self.article_id.as_ref().and_then(text::value_to_string),
                self.slug.as_ref().and_then(text::value_to_string),
                self.title.clone(),
            ])
            .unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: text::first_of([self.description, self.snippet, self.content])
                .unwrap_or_default(),
            url: text::first_of([self.url, self.link]).unwrap_or_else(|| String::from("#")),
            published_at: normalize_value(published),
            source: text::first_of([source_name(self.source.as_ref()), self.source_id, self.author]),
            thumbnail: text::first_of([self.image_url, self.image, self.thumbnail]),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Results {
    pub results: Vec<Value>,
}

/// Known response layouts, tried top to bottom. Items stay raw so one odd
/// article cannot knock the whole layout out.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum SearchResponse {
    NestedResults { data: Results },
    Results { results: Vec<Value> },
    Data { data: Vec<Value> },
    Bare(Vec<Value>),
}

impl SearchResponse {
    pub fn into_items(self) -> Vec<Value> {
        match self {
            SearchResponse::NestedResults { data } => data.results,
            SearchResponse::Results { results } => results,
            SearchResponse::Data { data } => data,
            SearchResponse::Bare(items) => items,
        }
    }
}

/// Unrecognized layouts decode to no articles; malformed items are skipped.
pub fn articles(body: Value) -> Vec<Article> {
    match SearchResponse::deserialize(body) {
        Ok(response) => text::decode_each(response.into_items()),
        Err(err) => {
            tracing::debug!(error = %err, "unrecognized news search payload");
            Vec::new()
        }
    }
}

pub fn normalize(body: Value) -> Vec<NewsItem> {
    articles(body)
        .into_iter()
        .take(MAX_ITEMS)
        .map(Article::into_item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn article(i: usize) -> Value {
        json!({"uuid": format!("a-{i}"), "title": format!("story {i}"), "published_at": 1700000000})
    }

    #[test]
    fn every_layout_decodes() {
        let layouts = [
            json!({"data": {"results": [article(1), article(2)]}}),
            json!({"results": [article(1), article(2)]}),
            json!({"data": [article(1), article(2)]}),
            json!([article(1), article(2)]),
        ];

        for body in layouts {
            let items = normalize(body);
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].id, "a-1");
            assert_eq!(items[1].title, "story 2");
            assert_eq!(items[0].published_at, "2023-11-14T22:13:20.000Z");
        }
    }

    #[test]
    fn unknown_layout_is_empty() {
        assert!(normalize(json!({"status": "ok", "items": []})).is_empty());
        assert!(normalize(json!({"data": "nothing"})).is_empty());
        assert!(normalize(json!(null)).is_empty());
    }

    #[test]
    fn odd_items_do_not_empty_the_response() {
        let body = json!({"data": [
            {"uuid": "a", "title": "good one"},
            {"uuid": 7, "title": "numeric uuid"},
            {"article_id": 99, "title": ["not", "text"], "image_url": false},
            "stray string"
        ]});

        let items = normalize(body);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[1].id, "7");
        assert_eq!(items[1].title, "numeric uuid");
        assert_eq!(items[2].id, "99");
        assert_eq!(items[2].title, "");
        assert_eq!(items[2].thumbnail, None);
    }

    #[test]
    fn caps_at_twenty() {
        let many: Vec<_> = (0..50).map(article).collect();
        assert_eq!(normalize(json!({"data": many})).len(), MAX_ITEMS);
    }

    #[test]
    fn maps_alternate_field_names() {
        let item = Article::deserialize(json!({
            "article_id": "xyz",
            "title": "ETH upgrade ships",
            "snippet": "The upgrade went live.",
            "link": "https://news.example/eth",
            "pubDate": "1700000000000",
            "source": {"name": "Decrypt"},
            "image": "https://img.example/eth.png"
        }))
        .expect("valid article")
        .into_item();

        assert_eq!(item.id, "xyz");
        assert_eq!(item.description, "The upgrade went live.");
        assert_eq!(item.url, "https://news.example/eth");
        assert_eq!(item.published_at, "2023-11-14T22:13:20.000Z");
        assert_eq!(item.source.as_deref(), Some("Decrypt"));
        assert_eq!(item.thumbnail.as_deref(), Some("https://img.example/eth.png"));
    }

    #[test]
    fn empty_article_gets_defaults() {
        let item = Article::default().into_item();
        assert_eq!(item.id, "");
        assert_eq!(item.url, "#");
        assert_eq!(item.source, None);
        assert!(DateTime::parse_from_rfc3339(&item.published_at).is_ok());
    }

    #[test]
    fn trailing_week_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
        let params = SearchParams::trailing_week("key", "bitcoin", now);
        assert_eq!(params.from, "2024-03-03");
        assert_eq!(params.to, "2024-03-10");
        assert_eq!(params.size, 20);
        assert_eq!(params.langs, "en");
    }
}
