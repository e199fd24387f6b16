use chrono::{DateTime, Local, NaiveDate, SubsecRound, Utc};

/// Source of the current time for discovery and memoized timestamps
pub trait Clock: Send + Sync {
    /// Current instant, truncated to whole seconds
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, taken from the UTC instant unless overridden
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
///
/// Instants are UTC; the calendar date follows the local time zone so
/// "already released" matches the operator's day.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.trunc_subsecs(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_system_clock_drops_subseconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn test_system_clock_today_is_local_date() {
        let before = Local::now().date_naive();
        let today = SystemClock.today();
        let after = Local::now().date_naive();
        assert!(today == before || today == after);
    }

    #[test]
    fn test_fixed_clock_today() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 23, 59, 59).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(clock.now(), instant);
    }
}
