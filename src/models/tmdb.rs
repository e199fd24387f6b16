use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Kind of title in the TMDB catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Show,
}

impl MediaKind {
    /// Path segment used by the TMDB REST API
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A title reached through a tracked person or company
///
/// The same numeric ID under a different kind is a different title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscoveredTitle {
    pub kind: MediaKind,
    pub id: u64,
}

impl DiscoveredTitle {
    pub fn movie(id: u64) -> Self {
        Self {
            kind: MediaKind::Movie,
            id,
        }
    }

    pub fn show(id: u64) -> Self {
        Self {
            kind: MediaKind::Show,
            id,
        }
    }
}

impl Display for DiscoveredTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Parses a TMDB `YYYY-MM-DD` date, treating empty or malformed values as absent
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

// ============================================================================
// Person combined credits
// ============================================================================

/// Raw response of `/person/{id}/combined_credits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombinedCredits {
    #[serde(default)]
    pub cast: Vec<CreditEntry>,
    #[serde(default)]
    pub crew: Vec<CreditEntry>,
}

/// One loosely-shaped credit entry as TMDB returns it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditEntry {
    pub id: u64,
    #[serde(default)]
    pub media_type: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub first_air_date: Option<NaiveDate>,
    #[serde(default)]
    pub video: Option<bool>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditRole {
    Cast,
    Crew,
}

/// A credit whose media type is neither a movie nor a show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMediaType {
    pub id: u64,
    pub media_type: String,
}

/// A person's cast or crew association with one title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonCredit {
    CastMovie {
        id: u64,
        release_date: Option<NaiveDate>,
        /// Stock or archival footage compilation
        video: bool,
        character: String,
        order: u32,
    },
    CastShow {
        id: u64,
        first_air_date: Option<NaiveDate>,
        character: String,
    },
    CrewMovie {
        id: u64,
        release_date: Option<NaiveDate>,
        video: bool,
        department: String,
        job: String,
    },
    CrewShow {
        id: u64,
        first_air_date: Option<NaiveDate>,
        department: String,
        job: String,
    },
}

impl PersonCredit {
    /// Converts a raw entry from the `cast` or `crew` list into its typed variant
    pub fn from_entry(role: CreditRole, entry: CreditEntry) -> Result<Self, UnknownMediaType> {
        let CreditEntry {
            id,
            media_type,
            release_date,
            first_air_date,
            video,
            character,
            order,
            department,
            job,
        } = entry;

        let credit = match (role, media_type.as_str()) {
            (CreditRole::Cast, "movie") => PersonCredit::CastMovie {
                id,
                release_date,
                video: video.unwrap_or(false),
                character: character.unwrap_or_default(),
                order: order.unwrap_or(0),
            },
            (CreditRole::Cast, "tv") => PersonCredit::CastShow {
                id,
                first_air_date,
                character: character.unwrap_or_default(),
            },
            (CreditRole::Crew, "movie") => PersonCredit::CrewMovie {
                id,
                release_date,
                video: video.unwrap_or(false),
                department: department.unwrap_or_default(),
                job: job.unwrap_or_default(),
            },
            (CreditRole::Crew, "tv") => PersonCredit::CrewShow {
                id,
                first_air_date,
                department: department.unwrap_or_default(),
                job: job.unwrap_or_default(),
            },
            _ => return Err(UnknownMediaType { id, media_type }),
        };

        Ok(credit)
    }

    pub fn id(&self) -> u64 {
        match self {
            PersonCredit::CastMovie { id, .. }
            | PersonCredit::CastShow { id, .. }
            | PersonCredit::CrewMovie { id, .. }
            | PersonCredit::CrewShow { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            PersonCredit::CastMovie { .. } | PersonCredit::CrewMovie { .. } => MediaKind::Movie,
            PersonCredit::CastShow { .. } | PersonCredit::CrewShow { .. } => MediaKind::Show,
        }
    }

    pub fn role(&self) -> CreditRole {
        match self {
            PersonCredit::CastMovie { .. } | PersonCredit::CastShow { .. } => CreditRole::Cast,
            PersonCredit::CrewMovie { .. } | PersonCredit::CrewShow { .. } => CreditRole::Crew,
        }
    }

    /// Release date for movies, first air date for shows
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            PersonCredit::CastMovie { release_date, .. }
            | PersonCredit::CrewMovie { release_date, .. } => *release_date,
            PersonCredit::CastShow { first_air_date, .. }
            | PersonCredit::CrewShow { first_air_date, .. } => *first_air_date,
        }
    }

    pub fn title(&self) -> DiscoveredTitle {
        DiscoveredTitle {
            kind: self.kind(),
            id: self.id(),
        }
    }
}

impl CombinedCredits {
    /// Cast entries followed by crew entries, typed
    pub fn into_credits(self) -> impl Iterator<Item = Result<PersonCredit, UnknownMediaType>> {
        let cast = self
            .cast
            .into_iter()
            .map(|entry| PersonCredit::from_entry(CreditRole::Cast, entry));
        let crew = self
            .crew
            .into_iter()
            .map(|entry| PersonCredit::from_entry(CreditRole::Crew, entry));
        cast.chain(crew)
    }
}

// ============================================================================
// Title details
// ============================================================================

/// Production status reported by TMDB
///
/// Movies use Rumored, Planned, In Production, Post Production, Released and
/// Canceled. Shows use Returning Series, Planned, In Production, Ended,
/// Canceled and Pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductionStatus {
    Rumored,
    Planned,
    #[serde(rename = "In Production")]
    InProduction,
    #[serde(rename = "Post Production")]
    PostProduction,
    Released,
    Canceled,
    #[serde(rename = "Returning Series")]
    ReturningSeries,
    Ended,
    Pilot,
    #[default]
    #[serde(other)]
    Other,
}

impl ProductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStatus::Rumored => "Rumored",
            ProductionStatus::Planned => "Planned",
            ProductionStatus::InProduction => "In Production",
            ProductionStatus::PostProduction => "Post Production",
            ProductionStatus::Released => "Released",
            ProductionStatus::Canceled => "Canceled",
            ProductionStatus::ReturningSeries => "Returning Series",
            ProductionStatus::Ended => "Ended",
            ProductionStatus::Pilot => "Pilot",
            ProductionStatus::Other => "Other",
        }
    }

    pub fn is_in_production(&self) -> bool {
        matches!(
            self,
            ProductionStatus::InProduction | ProductionStatus::PostProduction
        )
    }
}

impl Display for ProductionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job: String,
}

/// `/movie/{id}?append_to_response=credits,external_ids`
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub status: ProductionStatus,
    #[serde(default, deserialize_with = "lenient_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub external_ids: ExternalIds,
}

/// `/tv/{id}?append_to_response=credits,external_ids`
#[derive(Debug, Clone, Deserialize)]
pub struct ShowDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: ProductionStatus,
    #[serde(default, deserialize_with = "lenient_date")]
    pub first_air_date: Option<NaiveDate>,
    #[serde(default)]
    pub in_production: bool,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub external_ids: ExternalIds,
}

/// Full record for one discovered title
#[derive(Debug, Clone)]
pub enum MediaDetail {
    Movie(MovieDetail),
    Show(ShowDetail),
}

impl MediaDetail {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDetail::Movie(_) => MediaKind::Movie,
            MediaDetail::Show(_) => MediaKind::Show,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            MediaDetail::Movie(movie) => movie.id,
            MediaDetail::Show(show) => show.id,
        }
    }

    /// Display name: the movie title or the show name
    pub fn title(&self) -> &str {
        match self {
            MediaDetail::Movie(movie) => &movie.title,
            MediaDetail::Show(show) => &show.name,
        }
    }

    pub fn status(&self) -> ProductionStatus {
        match self {
            MediaDetail::Movie(movie) => movie.status,
            MediaDetail::Show(show) => show.status,
        }
    }

    /// Release date for movies, first air date for shows
    pub fn release_date(&self) -> Option<NaiveDate> {
        match self {
            MediaDetail::Movie(movie) => movie.release_date,
            MediaDetail::Show(show) => show.first_air_date,
        }
    }

    pub fn credits(&self) -> &Credits {
        match self {
            MediaDetail::Movie(movie) => &movie.credits,
            MediaDetail::Show(show) => &show.credits,
        }
    }

    /// IMDb cross-reference, ignoring empty strings
    pub fn imdb_id(&self) -> Option<&str> {
        let external_ids = match self {
            MediaDetail::Movie(movie) => &movie.external_ids,
            MediaDetail::Show(show) => &show.external_ids,
        };
        external_ids
            .imdb_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

// ============================================================================
// Discover
// ============================================================================

/// One page of a paginated TMDB listing
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Movie entry returned by `/discover/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub release_date: Option<NaiveDate>,
}
