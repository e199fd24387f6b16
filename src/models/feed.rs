use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";
pub const FEED_TITLE: &str = "Movies in Production";
pub const FEED_ICON: &str = "https://m.media-amazon.com/images/G/01/imdb/images-ANDW73HA/favicon_iPhone_retina_180x180._CB1582158069_.png";

/// JSON Feed document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feed {
    pub version: String,
    pub title: String,
    pub icon: String,
    pub items: Vec<FeedItem>,
}

/// One title in the feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedItem {
    /// Stable identifier, memoized per IMDb ID
    pub id: String,
    pub url: String,
    pub title: String,
    pub content_text: String,
    /// First time the title was seen in production
    pub date_published: DateTime<Utc>,
    /// Last time the title, status or release estimate changed
    pub date_modified: DateTime<Utc>,
}

impl FeedItem {
    /// IMDb page for a cross-reference ID
    pub fn imdb_url(imdb_id: &str) -> String {
        format!("https://www.imdb.com/title/{}/", imdb_id)
    }
}
