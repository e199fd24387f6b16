pub mod discovery;
pub mod enrichment;
pub mod feed;
pub mod identity;
pub mod pipeline;
pub mod providers;
pub mod report;

pub use discovery::DiscoveryEngine;
pub use enrichment::{enrich, EnrichedTitle};
pub use feed::{assemble, write_feed};
pub use identity::{IdentityAssigner, ItemIdentity};
pub use pipeline::FeedPipeline;
pub use providers::{CatalogProvider, TmdbProvider};
pub use report::{MemoryReporter, Reporter, Skip, TracingReporter};
