use futures::TryStreamExt;

use crate::{
    clock::Clock,
    db::MemoStore,
    error::{AppError, AppResult},
    models::{Feed, FeedItem, TrackedIds},
    services::{
        discovery::DiscoveryEngine,
        enrichment::enrich,
        feed::assemble,
        identity::IdentityAssigner,
        providers::CatalogProvider,
        report::{Reporter, Skip},
    },
};

pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Discovery, enrichment and identity assignment for one feed run
pub struct FeedPipeline<'a> {
    provider: &'a dyn CatalogProvider,
    store: &'a dyn MemoStore,
    clock: &'a dyn Clock,
    reporter: &'a dyn Reporter,
    tracked: &'a TrackedIds,
    fetch_concurrency: usize,
}

impl<'a> FeedPipeline<'a> {
    pub fn new(
        provider: &'a dyn CatalogProvider,
        store: &'a dyn MemoStore,
        clock: &'a dyn Clock,
        reporter: &'a dyn Reporter,
        tracked: &'a TrackedIds,
    ) -> Self {
        Self {
            provider,
            store,
            clock,
            reporter,
            tracked,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Number of title details fetched at once; zero is treated as one
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    /// Builds the feed
    ///
    /// A title whose detail fetch fails is reported and left out. Failures to
    /// list a person's credits or a company's slate, and store failures,
    /// abort the run. The store is not closed here.
    pub async fn build_feed(&self) -> AppResult<Feed> {
        let provider = self.provider;
        let today = self.clock.today();
        let engine = DiscoveryEngine::new(provider, self.reporter, today);
        let assigner = IdentityAssigner::new(self.store, self.clock);

        tracing::info!(
            provider = provider.name(),
            concurrency = self.fetch_concurrency,
            "Building feed"
        );

        let details = engine
            .discover(self.tracked)
            .map_ok(move |title| async move {
                Ok::<_, AppError>((title, provider.fetch_title_detail(title).await))
            })
            .try_buffered(self.fetch_concurrency);
        futures::pin_mut!(details);

        let mut discovered = 0usize;
        let mut items = Vec::new();

        while let Some((title, detail)) = details.try_next().await? {
            discovered += 1;

            let detail = match detail {
                Ok(detail) => detail,
                Err(e) => {
                    self.reporter.skipped(Skip::FetchFailed {
                        title,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(enriched) = enrich(title, &detail, &self.tracked.people, self.reporter)
            else {
                continue;
            };

            let identity = assigner.assign(&enriched)?;
            items.push(FeedItem {
                id: identity.id,
                url: FeedItem::imdb_url(&enriched.imdb_id),
                title: enriched.title,
                content_text: enriched.content_text,
                date_published: identity.date_published,
                date_modified: identity.date_modified,
            });
        }

        tracing::info!(
            discovered = discovered,
            items = items.len(),
            "Feed built"
        );

        Ok(assemble(items))
    }
}
