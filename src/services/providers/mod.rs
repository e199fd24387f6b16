//! Remote catalog abstraction
//!
//! The pipeline only ever reads from the catalog: one detail lookup per
//! discovered title, one filmography lookup per tracked person and a
//! paginated slate per tracked company.

use chrono::NaiveDate;
use futures::stream::{self, Stream, TryStreamExt};

use crate::{
    error::{AppError, AppResult},
    models::{CombinedCredits, DiscoveredTitle, MediaDetail, MovieSummary, PaginatedResponse},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for title catalogs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full record of a title with its credits and external IDs embedded
    async fn fetch_title_detail(&self, title: DiscoveredTitle) -> AppResult<MediaDetail>;

    /// Fetch a person's cast and crew credits across movies and shows
    async fn fetch_person_combined_credits(&self, person_id: u64) -> AppResult<CombinedCredits>;

    /// Fetch one page of a company's movies releasing on or after `min_release_date`,
    /// ascending by primary release date
    async fn discover_movies_by_company(
        &self,
        company_id: u64,
        min_release_date: NaiveDate,
        page: u32,
    ) -> AppResult<PaginatedResponse<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Lazily walks every page of a company's upcoming movie slate
///
/// A page is only requested once the previous page's results have been
/// consumed.
pub fn company_slate<'a>(
    provider: &'a dyn CatalogProvider,
    company_id: u64,
    min_release_date: NaiveDate,
) -> impl Stream<Item = AppResult<MovieSummary>> + 'a {
    stream::try_unfold(Some(1u32), move |next_page| async move {
        let Some(page) = next_page else {
            return Ok::<_, AppError>(None);
        };

        let response = provider
            .discover_movies_by_company(company_id, min_release_date, page)
            .await?;

        tracing::debug!(
            company_id = company_id,
            page = page,
            total_pages = response.total_pages,
            results = response.results.len(),
            provider = provider.name(),
            "Fetched company slate page"
        );

        let next_page = (page < response.total_pages).then_some(page + 1);
        let results = stream::iter(response.results.into_iter().map(Ok::<_, AppError>));

        Ok::<_, AppError>(Some((results, next_page)))
    })
    .try_flatten()
}
