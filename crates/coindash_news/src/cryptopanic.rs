use crate::date::normalize_value;
use crate::text;
use bon::Builder;
use coindash_shared_models::NewsItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BASE_URL: &str = "https://cryptopanic.com/api/v1/posts/";
pub const MAX_ITEMS: usize = 12;

#[derive(Serialize, Debug, Builder)]
pub struct PostsParams {
    #[builder(into)]
    pub auth: String,
    /// Comma-separated uppercase tickers.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub currencies: Option<String>,
    #[builder(into, default = String::from("news"))]
    pub kind: String,
    #[builder(default = true)]
    pub public: bool,
}

/// One post. Numbers in text fields read as text, other types as absent.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Post {
    pub id: Option<Value>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub domain: Option<String>,
    /// `{"title": ...}`
    pub source: Option<Value>,
    #[serde(deserialize_with = "text::lenient_string")]
    pub url: Option<String>,
    pub published_at: Option<Value>,
    /// `{"image": ...}`
    pub metadata: Option<Value>,
}

fn nested_text(object: Option<&Value>, key: &str) -> Option<String> {
    object?.get(key).and_then(text::value_to_string)
}

impl Post {
    pub fn into_item(self) -> NewsItem {
        let source_title = nested_text(self.source.as_ref(), "title");

        NewsItem {
            id: text::first_of([
                self.id.as_ref().and_then(text::value_to_string),
                self.slug,
                self.title.clone(),
            ])
            .unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: text::first_of([self.domain.clone(), source_title.clone()])
                .unwrap_or_default(),
            url: self.url.unwrap_or_else(|| String::from("#")),
            published_at: normalize_value(self.published_at.as_ref()),
            source: text::first_of([source_title, self.domain]),
            thumbnail: nested_text(self.metadata.as_ref(), "image"),
        }
    }
}

/// Reads `results` when it is an array; elements that are not posts are
/// skipped, anything else is empty.
pub fn posts(body: &Value) -> Vec<Post> {
    match body.get("results") {
        Some(Value::Array(results)) => text::decode_each(results.clone()),
        _ => Vec::new(),
    }
}

pub fn normalize(body: &Value) -> Vec<NewsItem> {
    posts(body)
        .into_iter()
        .take(MAX_ITEMS)
        .map(Post::into_item)
        .collect()
}
