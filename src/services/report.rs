use std::fmt::Display;

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::models::{DiscoveredTitle, ProductionStatus};

/// Why a credit or title was left out of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// Stock or archival footage compilation
    Video { title: DiscoveredTitle },
    AlreadyReleased {
        title: DiscoveredTitle,
        date: NaiveDate,
    },
    NotTopBilled { title: DiscoveredTitle, order: u32 },
    SelfCredit {
        title: DiscoveredTitle,
        character: String,
    },
    IrrelevantDepartment {
        title: DiscoveredTitle,
        department: String,
    },
    UnknownMediaType { id: u64, media_type: String },
    MissingImdbId { title: DiscoveredTitle, name: String },
    NotInProduction {
        title: DiscoveredTitle,
        name: String,
        status: ProductionStatus,
    },
    FetchFailed {
        title: DiscoveredTitle,
        error: String,
    },
}

impl Skip {
    /// Skips that point at bad upstream data rather than ordinary filtering
    pub fn is_warning(&self) -> bool {
        matches!(self, Skip::UnknownMediaType { .. } | Skip::FetchFailed { .. })
    }
}

impl Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skip::Video { title } => write!(f, "Skip video: {}", title),
            Skip::AlreadyReleased { title, date } => {
                write!(f, "Skip already released: {} ({})", title, date)
            }
            Skip::NotTopBilled { title, order } => {
                write!(f, "Skip non-top billed credit: {} (order {})", title, order)
            }
            Skip::SelfCredit { title, character } => {
                write!(f, "Skip self credit: {} ({:?})", title, character)
            }
            Skip::IrrelevantDepartment { title, department } => write!(
                f,
                "Skip not relevant crew department: {} ({})",
                title, department
            ),
            Skip::UnknownMediaType { id, media_type } => {
                write!(f, "Unknown credit media type: {} ({})", media_type, id)
            }
            Skip::MissingImdbId { title, name } => {
                write!(f, "Skip '{}' missing IMDb ID ({})", name, title)
            }
            Skip::NotInProduction {
                title,
                name,
                status,
            } => write!(f, "Skip '{}', not in production: {} ({})", name, status, title),
            Skip::FetchFailed { title, error } => {
                write!(f, "Skip {}, fetch failed: {}", title, error)
            }
        }
    }
}

/// Port through which the pipeline reports skipped credits and titles
pub trait Reporter: Send + Sync {
    fn skipped(&self, skip: Skip);
}

/// Logs skips through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn skipped(&self, skip: Skip) {
        if skip.is_warning() {
            tracing::warn!("{}", skip);
        } else {
            tracing::debug!("{}", skip);
        }
    }
}

/// Keeps skips in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    skips: Mutex<Vec<Skip>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skips(&self) -> Vec<Skip> {
        self.skips.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.skips.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.skips.lock().is_empty()
    }
}

impl Reporter for MemoryReporter {
    fn skipped(&self, skip: Skip) {
        self.skips.lock().push(skip);
    }
}
