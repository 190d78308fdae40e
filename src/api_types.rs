use serde::{Deserialize, Serialize};

/* Reddit */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// `{"kind": "Listing", "data": {"after": ..., "children": [...]}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingData<T> {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String, // "t3" submission, "t1" comment
    pub data: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub selftext: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub permalink: String, // relative, "/r/rust/comments/..."
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawComment {
    pub id: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub permalink: String,
}

/* X / Twitter API v2 */

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>, // RFC 3339, "2023-11-14T22:13:20.000Z"
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<ApiUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// One page of `/2/tweets/search/recent` or `/2/users/:id/tweets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweetPage {
    #[serde(default)]
    pub data: Option<Vec<RawMessage>>,
    #[serde(default)]
    pub includes: Option<Includes>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLookup {
    #[serde(default)]
    pub data: Option<ApiUser>,
}
