pub mod feed;
pub mod tmdb;

pub use feed::{Feed, FeedItem};
pub use tmdb::{
    CastMember, CombinedCredits, CreditEntry, CreditRole, Credits, CrewMember, DiscoveredTitle,
    ExternalIds, MediaDetail, MediaKind, MovieDetail, MovieSummary, PaginatedResponse,
    PersonCredit, ProductionStatus, ShowDetail, UnknownMediaType,
};

use std::collections::BTreeSet;

/// People and companies whose upcoming work the feed follows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedIds {
    pub people: BTreeSet<u64>,
    pub companies: BTreeSet<u64>,
}
