use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    clock::Clock,
    db::{MemoKey, MemoStore},
    error::AppResult,
    services::enrichment::EnrichedTitle,
};

/// Memoized facts that keep a feed item stable across runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIdentity {
    pub id: String,
    pub date_published: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// Looks up or records item identity in a memo store
#[derive(Clone, Copy)]
pub struct IdentityAssigner<'a> {
    store: &'a dyn MemoStore,
    clock: &'a dyn Clock,
}

impl<'a> IdentityAssigner<'a> {
    pub fn new(store: &'a dyn MemoStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// `date_modified` moves whenever the title, status or release estimate
    /// changes; the id and `date_published` never do once recorded.
    pub fn assign(&self, title: &EnrichedTitle) -> AppResult<ItemIdentity> {
        let imdb_id = &title.imdb_id;

        let date_published: DateTime<Utc> = self
            .store
            .memoize(&MemoKey::FirstSeenInProduction(imdb_id.clone()), || {
                self.clock.now()
            })?;

        let fingerprint = MemoKey::DetailsUpdated {
            imdb_id: imdb_id.clone(),
            title: title.title.clone(),
            status: title.status.to_string(),
            release_estimate: title.release_estimate.clone(),
        };
        let date_modified: DateTime<Utc> =
            self.store.memoize(&fingerprint, || self.clock.now())?;

        let id: String = self
            .store
            .memoize(&MemoKey::ItemId(imdb_id.clone()), || {
                Uuid::new_v4().to_string()
            })?;

        tracing::debug!(
            imdb_id = %imdb_id,
            item_id = %id,
            date_published = %date_published,
            date_modified = %date_modified,
            "Identity assigned"
        );

        Ok(ItemIdentity {
            id,
            date_published,
            date_modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::{LruStore, PersistentStore};
    use crate::models::ProductionStatus;
    use chrono::TimeZone;

    fn nova() -> EnrichedTitle {
        EnrichedTitle {
            imdb_id: "tt9999999".to_string(),
            title: "Nova".to_string(),
            status: ProductionStatus::InProduction,
            release_estimate: "March 2026".to_string(),
            content_text: "\"Nova\" directed by TBA.".to_string(),
        }
    }

    fn at(day: u32) -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_first_assignment_uses_clock() {
        let store = LruStore::new(100).unwrap();
        let clock = at(1);

        let identity = IdentityAssigner::new(&store, &clock).assign(&nova()).unwrap();

        assert_eq!(identity.date_published, clock.0);
        assert_eq!(identity.date_modified, clock.0);
        assert!(Uuid::parse_str(&identity.id).is_ok());
    }

    #[test]
    fn test_unchanged_title_keeps_identity() {
        let store = LruStore::new(100).unwrap();

        let first = IdentityAssigner::new(&store, &at(1)).assign(&nova()).unwrap();
        let second = IdentityAssigner::new(&store, &at(2)).assign(&nova()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_status_change_moves_only_date_modified() {
        let store = LruStore::new(100).unwrap();
        let later = at(5);

        let first = IdentityAssigner::new(&store, &at(1)).assign(&nova()).unwrap();
        let mut changed = nova();
        changed.status = ProductionStatus::PostProduction;
        let second = IdentityAssigner::new(&store, &later).assign(&changed).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.date_published, first.date_published);
        assert_eq!(second.date_modified, later.0);
    }

    #[test]
    fn test_release_estimate_change_moves_date_modified() {
        let store = LruStore::new(100).unwrap();

        let first = IdentityAssigner::new(&store, &at(1)).assign(&nova()).unwrap();
        let mut changed = nova();
        changed.release_estimate = "April 2026".to_string();
        let second = IdentityAssigner::new(&store, &at(3)).assign(&changed).unwrap();

        assert_ne!(second.date_modified, first.date_modified);
        assert_eq!(second.id, first.id);
    }

    #[test]
    fn test_identity_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let first = {
            let store = PersistentStore::open(&path, 100).unwrap();
            let identity = IdentityAssigner::new(&store, &at(1)).assign(&nova()).unwrap();
            store.close().unwrap();
            identity
        };

        let store = PersistentStore::open(&path, 100).unwrap();
        let second = IdentityAssigner::new(&store, &at(9)).assign(&nova()).unwrap();

        assert_eq!(first, second);
    }
}
