use std::collections::BTreeSet;
use std::io::BufRead;

use crate::error::{AppError, AppResult};

/// Reads a newline-delimited list of tracked TMDB IDs
///
/// Each line holds a positive integer, optionally followed by a `-slug`
/// suffix as found in TMDB URLs (`525-christopher-nolan`). Blank lines are
/// ignored; anything else that fails to parse aborts the run.
pub fn read_ids<R: BufRead>(reader: R) -> AppResult<BTreeSet<u64>> {
    let mut ids = BTreeSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let head = line.split('-').next().unwrap_or_default().trim();
        let id = head
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::InvalidInput(format!("line {}: invalid TMDB ID {:?}", index + 1, line))
            })?;

        ids.insert(id);
    }

    Ok(ids)
}
