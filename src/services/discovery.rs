//! Credit discovery
//!
//! Walks each tracked person's combined filmography and each tracked
//! company's upcoming slate, keeps only credits that point at unreleased,
//! scripted, top-billed or creative work, and yields every title at most
//! once per run.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

use chrono::NaiveDate;
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoveredTitle, PersonCredit, TrackedIds},
    services::{
        providers::{company_slate, CatalogProvider},
        report::{Reporter, Skip},
    },
};

/// Crew departments whose members shape the work
const RELEVANT_DEPARTMENTS: [&str; 2] = ["Directing", "Writing"];

/// Highest movie billing order still considered top billed
const MAX_BILLING_ORDER: u32 = 10;

/// Characters marking non-fiction or cameo appearances
static SELF_CHARACTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)self|himself|herself|uncredited|interviewee|archive footage").unwrap()
});

pub fn is_self_character(character: &str) -> bool {
    SELF_CHARACTER_PATTERN.is_match(character)
}

fn is_released(date: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    date.filter(|date| *date <= today)
}

/// Decides whether a person's credit belongs in the feed
pub fn check_credit(credit: &PersonCredit, today: NaiveDate) -> Result<DiscoveredTitle, Skip> {
    let title = credit.title();

    if let PersonCredit::CastMovie { video: true, .. } | PersonCredit::CrewMovie { video: true, .. } =
        credit
    {
        return Err(Skip::Video { title });
    }

    if let Some(date) = is_released(credit.date(), today) {
        return Err(Skip::AlreadyReleased { title, date });
    }

    match credit {
        PersonCredit::CastMovie { order, .. } if *order > MAX_BILLING_ORDER => {
            Err(Skip::NotTopBilled {
                title,
                order: *order,
            })
        }
        PersonCredit::CastMovie { character, .. } | PersonCredit::CastShow { character, .. }
            if is_self_character(character) =>
        {
            Err(Skip::SelfCredit {
                title,
                character: character.clone(),
            })
        }
        PersonCredit::CrewMovie { department, .. } | PersonCredit::CrewShow { department, .. }
            if !RELEVANT_DEPARTMENTS.contains(&department.as_str()) =>
        {
            Err(Skip::IrrelevantDepartment {
                title,
                department: department.clone(),
            })
        }
        _ => Ok(title),
    }
}

/// Drops repeated items, keeping the first occurrence, without buffering the stream
pub fn unique<S, T, E>(stream: S) -> impl Stream<Item = Result<T, E>>
where
    S: Stream<Item = Result<T, E>>,
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    stream.try_filter(move |item| future::ready(seen.insert(item.clone())))
}

/// Produces the titles relevant to the tracked people and companies
#[derive(Clone, Copy)]
pub struct DiscoveryEngine<'a> {
    provider: &'a dyn CatalogProvider,
    reporter: &'a dyn Reporter,
    today: NaiveDate,
}

impl<'a> DiscoveryEngine<'a> {
    pub fn new(
        provider: &'a dyn CatalogProvider,
        reporter: &'a dyn Reporter,
        today: NaiveDate,
    ) -> Self {
        Self {
            provider,
            reporter,
            today,
        }
    }

    /// Relevant titles from one person's combined filmography
    pub fn person_titles(&self, person_id: u64) -> impl Stream<Item = AppResult<DiscoveredTitle>> + 'a {
        let Self {
            provider,
            reporter,
            today,
        } = *self;

        stream::once(async move { provider.fetch_person_combined_credits(person_id).await })
            .map_ok(move |credits| {
                let titles = credits.into_credits().filter_map(move |credit| {
                    let checked = match credit {
                        Ok(credit) => check_credit(&credit, today),
                        Err(unknown) => Err(Skip::UnknownMediaType {
                            id: unknown.id,
                            media_type: unknown.media_type,
                        }),
                    };

                    match checked {
                        Ok(title) => Some(Ok::<_, AppError>(title)),
                        Err(skip) => {
                            reporter.skipped(skip);
                            None
                        }
                    }
                });
                stream::iter(titles)
            })
            .try_flatten()
    }

    /// Unreleased movies from one company's slate
    pub fn company_titles(&self, company_id: u64) -> impl Stream<Item = AppResult<DiscoveredTitle>> + 'a {
        let Self {
            provider,
            reporter,
            today,
        } = *self;

        company_slate(provider, company_id, today).try_filter_map(move |movie| {
            let title = DiscoveredTitle::movie(movie.id);
            let kept = match is_released(movie.release_date, today) {
                Some(date) => {
                    reporter.skipped(Skip::AlreadyReleased { title, date });
                    None
                }
                None => Some(title),
            };
            future::ready(Ok::<_, AppError>(kept))
        })
    }

    /// People first, then companies, each title yielded once
    ///
    /// A failed person or company lookup surfaces as an error item.
    pub fn discover(&self, tracked: &TrackedIds) -> impl Stream<Item = AppResult<DiscoveredTitle>> + 'a {
        let engine = *self;
        let people: Vec<u64> = tracked.people.iter().copied().collect();
        let companies: Vec<u64> = tracked.companies.iter().copied().collect();

        tracing::info!(
            people = people.len(),
            companies = companies.len(),
            today = %self.today,
            "Discovering upcoming titles"
        );

        let from_people = stream::iter(people)
            .map(move |person_id| engine.person_titles(person_id))
            .flatten();
        let from_companies = stream::iter(companies)
            .map(move |company_id| engine.company_titles(company_id))
            .flatten();

        unique(from_people.chain(from_companies))
    }
}
