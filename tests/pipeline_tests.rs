use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use upcoming_feed::{
    clock::FixedClock,
    db::{open_store, MemoStore},
    error::{AppError, AppResult},
    models::{
        CombinedCredits, DiscoveredTitle, MediaDetail, MediaKind, MovieSummary, PaginatedResponse,
        TrackedIds,
    },
    services::{write_feed, CatalogProvider, FeedPipeline, MemoryReporter, Skip},
};

/// Catalog backed by canned TMDB responses
#[derive(Default)]
struct FakeCatalog {
    details: HashMap<DiscoveredTitle, Value>,
    people: HashMap<u64, Value>,
    slates: HashMap<(u64, u32), Value>,
    detail_requests: Mutex<Vec<DiscoveredTitle>>,
}

impl FakeCatalog {
    fn with_detail(mut self, title: DiscoveredTitle, body: Value) -> Self {
        self.details.insert(title, body);
        self
    }

    fn with_person(mut self, person_id: u64, body: Value) -> Self {
        self.people.insert(person_id, body);
        self
    }

    fn with_slate_page(mut self, company_id: u64, page: u32, body: Value) -> Self {
        self.slates.insert((company_id, page), body);
        self
    }

    fn not_found() -> AppError {
        AppError::ExternalApi {
            status: 404,
            message: "The resource you requested could not be found.".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn fetch_title_detail(&self, title: DiscoveredTitle) -> AppResult<MediaDetail> {
        self.detail_requests.lock().push(title);
        let body = self.details.get(&title).cloned().ok_or_else(Self::not_found)?;
        Ok(match title.kind {
            MediaKind::Movie => MediaDetail::Movie(serde_json::from_value(body)?),
            MediaKind::Show => MediaDetail::Show(serde_json::from_value(body)?),
        })
    }

    async fn fetch_person_combined_credits(&self, person_id: u64) -> AppResult<CombinedCredits> {
        let body = self.people.get(&person_id).cloned().ok_or_else(Self::not_found)?;
        Ok(serde_json::from_value(body)?)
    }

    async fn discover_movies_by_company(
        &self,
        company_id: u64,
        _min_release_date: NaiveDate,
        page: u32,
    ) -> AppResult<PaginatedResponse<MovieSummary>> {
        let body = self
            .slates
            .get(&(company_id, page))
            .cloned()
            .ok_or_else(Self::not_found)?;
        Ok(serde_json::from_value(body)?)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn clock(day: u32) -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap())
}

fn tracked(people: &[u64], companies: &[u64]) -> TrackedIds {
    TrackedIds {
        people: people.iter().copied().collect(),
        companies: companies.iter().copied().collect(),
    }
}

fn movie_detail(id: u64, title: &str, status: &str, imdb_id: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "release_date": "2026-03-01",
        "credits": {
            "cast": [],
            "crew": [
                {"id": 5, "name": "A. Director", "department": "Directing", "job": "Director"}
            ]
        },
        "external_ids": {"imdb_id": imdb_id}
    })
}

fn director_credits(movie_ids: &[u64]) -> Value {
    let crew: Vec<Value> = movie_ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "media_type": "movie",
                "release_date": "2026-03-01",
                "department": "Directing",
                "job": "Director"
            })
        })
        .collect();
    json!({"cast": [], "crew": crew})
}

fn nova_catalog() -> FakeCatalog {
    FakeCatalog::default()
        .with_person(5, director_credits(&[100]))
        .with_detail(
            DiscoveredTitle::movie(100),
            movie_detail(100, "Nova", "In Production", "tt9999999"),
        )
}

#[tokio::test]
async fn test_single_director_feed() {
    let catalog = nova_catalog();
    let store = assert_ok!(open_store(None, 100));
    let clock = clock(1);
    let reporter = MemoryReporter::new();
    let tracked = tracked(&[5], &[]);

    let feed = assert_ok!(
        FeedPipeline::new(&catalog, store.as_ref(), &clock, &reporter, &tracked)
            .build_feed()
            .await
    );

    assert_eq!(feed.version, "https://jsonfeed.org/version/1.1");
    assert_eq!(feed.title, "Movies in Production");
    assert_eq!(feed.items.len(), 1);

    let item = &feed.items[0];
    assert_eq!(item.url, "https://www.imdb.com/title/tt9999999/");
    assert_eq!(item.title, "Nova");
    assert_eq!(
        item.content_text,
        "\"Nova\" directed by A. Director. Coming March 2026."
    );
    assert_eq!(item.date_published, clock.0);
    assert_eq!(item.date_modified, clock.0);
}

#[tokio::test]
async fn test_feed_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.json");
    let tracked = tracked(&[5], &[]);

    let mut outputs = Vec::new();
    for day in [1, 2] {
        let catalog = nova_catalog();
        let store = assert_ok!(open_store(Some(path.as_path()), 100));
        let clock = clock(day);
        let reporter = MemoryReporter::new();

        let feed = assert_ok!(
            FeedPipeline::new(&catalog, store.as_ref(), &clock, &reporter, &tracked)
                .build_feed()
                .await
        );
        assert_ok!(store.close());

        let mut out = Vec::new();
        assert_ok!(write_feed(&feed, &mut out));
        outputs.push(out);
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_status_change_updates_date_modified_only() {
    let store = assert_ok!(open_store(None, 100));
    let tracked = tracked(&[5], &[]);
    let reporter = MemoryReporter::new();

    let first_clock = clock(1);
    let first = assert_ok!(
        FeedPipeline::new(&nova_catalog(), store.as_ref(), &first_clock, &reporter, &tracked)
            .build_feed()
            .await
    );

    let changed = FakeCatalog::default()
        .with_person(5, director_credits(&[100]))
        .with_detail(
            DiscoveredTitle::movie(100),
            movie_detail(100, "Nova", "Post Production", "tt9999999"),
        );
    let second_clock = clock(8);
    let second = assert_ok!(
        FeedPipeline::new(&changed, store.as_ref(), &second_clock, &reporter, &tracked)
            .build_feed()
            .await
    );

    assert_eq!(second.items[0].id, first.items[0].id);
    assert_eq!(second.items[0].date_published, first_clock.0);
    assert_eq!(second.items[0].date_modified, second_clock.0);
}

#[tokio::test]
async fn test_items_sorted_by_id_and_deduplicated() {
    let catalog = FakeCatalog::default()
        .with_person(5, director_credits(&[100, 200]))
        .with_person(6, director_credits(&[200, 300]))
        .with_slate_page(
            42,
            1,
            json!({
                "page": 1,
                "total_pages": 2,
                "total_results": 2,
                "results": [{"id": 300, "title": "Three", "release_date": "2026-06-01"}]
            }),
        )
        .with_slate_page(
            42,
            2,
            json!({
                "page": 2,
                "total_pages": 2,
                "total_results": 2,
                "results": [
                    {"id": 400, "title": "Old", "release_date": "2020-01-01"},
                    {"id": 500, "title": "Five", "release_date": ""}
                ]
            }),
        )
        .with_detail(
            DiscoveredTitle::movie(100),
            movie_detail(100, "One", "In Production", "tt0000100"),
        )
        .with_detail(
            DiscoveredTitle::movie(200),
            movie_detail(200, "Two", "Post Production", "tt0000200"),
        )
        .with_detail(
            DiscoveredTitle::movie(300),
            movie_detail(300, "Three", "In Production", "tt0000300"),
        )
        .with_detail(
            DiscoveredTitle::movie(500),
            movie_detail(500, "Five", "Planned", "tt0000500"),
        );
    let store = assert_ok!(open_store(None, 100));
    let clock = clock(1);
    let reporter = MemoryReporter::new();
    let tracked = tracked(&[5, 6], &[42]);

    let feed = assert_ok!(
        FeedPipeline::new(&catalog, store.as_ref(), &clock, &reporter, &tracked)
            .with_fetch_concurrency(3)
            .build_feed()
            .await
    );

    let mut requested = catalog.detail_requests.lock().clone();
    requested.sort();
    assert_eq!(
        requested,
        vec![
            DiscoveredTitle::movie(100),
            DiscoveredTitle::movie(200),
            DiscoveredTitle::movie(300),
            DiscoveredTitle::movie(500),
        ]
    );

    let titles: BTreeSet<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, BTreeSet::from(["One", "Three", "Two"]));

    let ids: Vec<&str> = feed.items.iter().map(|i| i.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    let skips = reporter.skips();
    assert!(skips.iter().any(|s| matches!(s, Skip::AlreadyReleased { .. })));
    assert!(skips.iter().any(|s| matches!(s, Skip::NotInProduction { .. })));
}

#[tokio::test]
async fn test_missing_detail_is_skipped_not_fatal() {
    let catalog = FakeCatalog::default()
        .with_person(5, director_credits(&[100, 101]))
        .with_detail(
            DiscoveredTitle::movie(100),
            movie_detail(100, "Nova", "In Production", "tt9999999"),
        );
    let store = assert_ok!(open_store(None, 100));
    let clock = clock(1);
    let reporter = MemoryReporter::new();
    let tracked = tracked(&[5], &[]);

    let feed = assert_ok!(
        FeedPipeline::new(&catalog, store.as_ref(), &clock, &reporter, &tracked)
            .build_feed()
            .await
    );

    assert_eq!(feed.items.len(), 1);
    assert_eq!(
        reporter.skips(),
        vec![Skip::FetchFailed {
            title: DiscoveredTitle::movie(101),
            error: FakeCatalog::not_found().to_string(),
        }]
    );
}

#[tokio::test]
async fn test_unknown_company_aborts_run() {
    let catalog = nova_catalog();
    let store = assert_ok!(open_store(None, 100));
    let clock = clock(1);
    let reporter = MemoryReporter::new();
    let tracked = tracked(&[5], &[77]);

    let result = FeedPipeline::new(&catalog, store.as_ref(), &clock, &reporter, &tracked)
        .build_feed()
        .await;

    assert_err!(result);
}

#[tokio::test]
async fn test_empty_tracking_yields_empty_feed() {
    let catalog = FakeCatalog::default();
    let store = assert_ok!(open_store(None, 100));
    let clock = clock(1);
    let reporter = MemoryReporter::new();
    let tracked = TrackedIds::default();

    let feed = assert_ok!(
        FeedPipeline::new(&catalog, store.as_ref(), &clock, &reporter, &tracked)
            .build_feed()
            .await
    );

    assert!(feed.items.is_empty());
    assert!(reporter.is_empty());
}
