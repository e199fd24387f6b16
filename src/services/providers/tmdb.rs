//! TMDB API provider
//!
//! All requests are read-only GETs authenticated with the `api_key` query
//! parameter. Title details embed credits and external IDs through
//! `append_to_response` so one request covers enrichment.

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        CombinedCredits, DiscoveredTitle, MediaDetail, MediaKind, MovieSummary, PaginatedResponse,
    },
    services::providers::CatalogProvider,
};
use chrono::NaiveDate;
use reqwest::{header::ACCEPT, Client as HttpClient};
use serde::de::DeserializeOwned;
use std::time::Duration;

const APPEND_TO_RESPONSE: &str = "credits,external_ids";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests fail after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.api_key()?.to_string(),
            config.tmdb_api_url.clone(),
            config.request_timeout(),
        )
    }

    /// Path of the detail endpoint for a title
    fn detail_path(title: DiscoveredTitle) -> String {
        format!("/{}/{}", title.kind.path_segment(), title.id)
    }

    /// Issues a GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);
        tracing::info!(path = %path, provider = "tmdb", "Fetch");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(redact)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi {
                status: status.as_u16(),
                message: body,
            });
        }

        let response_text = response.text().await.map_err(redact)?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::Json(e)
        })
    }
}

/// Drops the request URL, which carries the API key, from a client error
fn redact(error: reqwest::Error) -> AppError {
    AppError::HttpClient(error.without_url())
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn fetch_title_detail(&self, title: DiscoveredTitle) -> AppResult<MediaDetail> {
        let path = Self::detail_path(title);
        let query = [("append_to_response", APPEND_TO_RESPONSE.to_string())];

        let detail = match title.kind {
            MediaKind::Movie => MediaDetail::Movie(self.get_json(&path, &query).await?),
            MediaKind::Show => MediaDetail::Show(self.get_json(&path, &query).await?),
        };

        tracing::debug!(
            title_id = %title,
            name = %detail.title(),
            status = %detail.status(),
            "Title detail fetched"
        );

        Ok(detail)
    }

    async fn fetch_person_combined_credits(&self, person_id: u64) -> AppResult<CombinedCredits> {
        let path = format!("/person/{}/combined_credits", person_id);
        let credits: CombinedCredits = self.get_json(&path, &[]).await?;

        tracing::debug!(
            person_id = person_id,
            cast = credits.cast.len(),
            crew = credits.crew.len(),
            "Person credits fetched"
        );

        Ok(credits)
    }

    async fn discover_movies_by_company(
        &self,
        company_id: u64,
        min_release_date: NaiveDate,
        page: u32,
    ) -> AppResult<PaginatedResponse<MovieSummary>> {
        let query = [
            (
                "release_date.gte",
                min_release_date.format("%Y-%m-%d").to_string(),
            ),
            ("sort_by", "primary_release_date.asc".to_string()),
            ("with_companies", company_id.to_string()),
            ("page", page.to_string()),
        ];

        self.get_json("/discover/movie", &query).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
