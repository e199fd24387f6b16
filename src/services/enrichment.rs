use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
    models::{Credits, DiscoveredTitle, MediaDetail, MovieDetail, ProductionStatus, ShowDetail},
    services::report::{Reporter, Skip},
};

/// A title that passed the production checks, with its feed text rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTitle {
    pub imdb_id: String,
    pub title: String,
    pub status: ProductionStatus,
    /// `Month YYYY` of a movie's release date, empty otherwise
    pub release_estimate: String,
    pub content_text: String,
}

/// Renders a date as `March 2026`
pub fn release_estimate(date: Option<NaiveDate>) -> Option<String> {
    date.map(|date| date.format("%B %Y").to_string())
}

/// Sorted, distinct names of tracked people among the cast and crew
pub fn relevant_people_names(credits: &Credits, tracked_people: &BTreeSet<u64>) -> Vec<String> {
    let cast = credits
        .cast
        .iter()
        .filter(|member| tracked_people.contains(&member.id))
        .map(|member| member.name.clone());
    let crew = credits
        .crew
        .iter()
        .filter(|member| tracked_people.contains(&member.id))
        .map(|member| member.name.clone());

    cast.chain(crew)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

fn append_coming(content: &mut String, date: Option<NaiveDate>) {
    if let Some(estimate) = release_estimate(date) {
        content.push_str(&format!(" Coming {}.", estimate));
    }
}

/// `"Title" directed by Name along with Others. Coming Month YYYY.`
pub fn movie_content_text(movie: &MovieDetail, tracked_people: &BTreeSet<u64>) -> String {
    let director = movie
        .credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.as_str())
        .unwrap_or("TBA");

    let mut content = format!("\"{}\" directed by {}", movie.title, director);

    let others: Vec<String> = relevant_people_names(&movie.credits, tracked_people)
        .into_iter()
        .filter(|name| name != director)
        .collect();
    if !others.is_empty() {
        content.push_str(&format!(" along with {}", others.join(", ")));
    }
    content.push('.');

    append_coming(&mut content, movie.release_date);
    content
}

/// `"Name" with People. Coming Month YYYY.`
pub fn show_content_text(show: &ShowDetail, tracked_people: &BTreeSet<u64>) -> String {
    let mut content = format!("\"{}\"", show.name);

    let people = relevant_people_names(&show.credits, tracked_people);
    if !people.is_empty() {
        content.push_str(&format!(" with {}", people.join(", ")));
    }
    content.push('.');

    append_coming(&mut content, show.first_air_date);
    content
}

pub fn content_text(detail: &MediaDetail, tracked_people: &BTreeSet<u64>) -> String {
    match detail {
        MediaDetail::Movie(movie) => movie_content_text(movie, tracked_people),
        MediaDetail::Show(show) => show_content_text(show, tracked_people),
    }
}

/// Release estimate used in the details fingerprint
///
/// Only movies contribute one; a show's first air date is left out so that
/// existing memoized fingerprints stay valid.
fn fingerprint_release_estimate(detail: &MediaDetail) -> String {
    match detail {
        MediaDetail::Movie(movie) => release_estimate(movie.release_date).unwrap_or_default(),
        MediaDetail::Show(_) => String::new(),
    }
}

/// Checks that a title can be linked and is in production, then renders its text
///
/// Returns `None` after reporting the reason when the title is left out.
pub fn enrich(
    title: DiscoveredTitle,
    detail: &MediaDetail,
    tracked_people: &BTreeSet<u64>,
    reporter: &dyn Reporter,
) -> Option<EnrichedTitle> {
    let name = detail.title();

    let Some(imdb_id) = detail.imdb_id() else {
        reporter.skipped(Skip::MissingImdbId {
            title,
            name: name.to_string(),
        });
        return None;
    };

    let status = detail.status();
    if !status.is_in_production() {
        reporter.skipped(Skip::NotInProduction {
            title,
            name: name.to_string(),
            status,
        });
        return None;
    }

    Some(EnrichedTitle {
        imdb_id: imdb_id.to_string(),
        title: name.to_string(),
        status,
        release_estimate: fingerprint_release_estimate(detail),
        content_text: content_text(detail, tracked_people),
    })
}
