use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{
    error::AppResult,
    models::{
        feed::{FEED_ICON, FEED_TITLE, JSON_FEED_VERSION},
        Feed, FeedItem,
    },
};

/// Wraps items into a feed document, ordered by item id
pub fn assemble(mut items: Vec<FeedItem>) -> Feed {
    items.sort_by(|a, b| a.id.cmp(&b.id));

    Feed {
        version: JSON_FEED_VERSION.to_string(),
        title: FEED_TITLE.to_string(),
        icon: FEED_ICON.to_string(),
        items,
    }
}

/// Writes the feed as JSON indented by four spaces, ending with a newline
pub fn write_feed<W: Write>(feed: &Feed, mut writer: W) -> AppResult<()> {
    {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut writer, formatter);
        feed.serialize(&mut serializer)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
