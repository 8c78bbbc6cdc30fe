use crate::schedule::Schedule;
use chrono::{DateTime, Duration, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_GIVE_UP_AFTER_SECS: u64 = 24 * 60 * 60;

// largest number of seconds a chrono Duration can hold
const MAX_SECS: i64 = i64::MAX / 1000;

/// Bounds for the next occurrence search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of minimal-unit steps taken from the reference.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Stop early when nothing has matched this many seconds past the
    /// reference. `None` disables the early stop.
    #[serde(default = "default_give_up_after_secs")]
    pub give_up_after_secs: Option<u64>,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_give_up_after_secs() -> Option<u64> {
    Some(DEFAULT_GIVE_UP_AFTER_SECS)
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            give_up_after_secs: default_give_up_after_secs(),
        }
    }
}

impl SearchConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_give_up_after_secs(mut self, secs: u64) -> Self {
        self.give_up_after_secs = Some(secs);
        self
    }

    /// Only `max_iterations` bounds the search.
    pub fn without_give_up(mut self) -> Self {
        self.give_up_after_secs = None;
        self
    }
}

impl Schedule {
    /// Accepts a DateTime as a placeholder to iterate forwards over the times the
    /// CRON expression is to run, strictly after it.
    ///
    /// The walk advances one second at a time with seconds enabled, one whole
    /// minute otherwise, and stops for good once `config` says so.
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use cron_insight::{Schedule, SearchConfig};
    ///
    /// let schedule = Schedule::parse("0 9,12 * * *", false).unwrap();
    /// let from_date = Utc.with_ymd_and_hms(2022, 6, 1, 8, 40, 1).unwrap();
    /// let config = SearchConfig::default().with_max_iterations(24 * 60);
    ///
    /// let upcoming: Vec<_> = schedule.iter_from(&from_date, config).collect();
    /// assert_eq!(2, upcoming.len());
    /// assert_eq!(Utc.with_ymd_and_hms(2022, 6, 1, 9, 0, 0).unwrap(), upcoming[0]);
    /// ```
    pub fn iter_from<'a, Z>(
        &'a self,
        dt: &DateTime<Z>,
        config: SearchConfig,
    ) -> Occurrences<'a, Z>
    where
        Z: TimeZone,
    {
        Occurrences::new(self, dt, config)
    }

    /// Up to `count` occurrences after `reference` with the default bounds.
    /// Fewer, or none, means no further run was found within the budget.
    pub fn next_occurrences<Z>(&self, reference: &DateTime<Z>, count: usize) -> Vec<DateTime<Z>>
    where
        Z: TimeZone,
    {
        self.next_occurrences_with(reference, count, SearchConfig::default())
    }

    pub fn next_occurrences_with<Z>(
        &self,
        reference: &DateTime<Z>,
        count: usize,
        config: SearchConfig,
    ) -> Vec<DateTime<Z>>
    where
        Z: TimeZone,
    {
        self.iter_from(reference, config).take(count).collect()
    }

    fn step(&self) -> Duration {
        if self.includes_seconds() {
            Duration::seconds(1)
        } else {
            Duration::minutes(1)
        }
    }

    fn truncate<Z>(&self, dt: &DateTime<Z>) -> DateTime<Z>
    where
        Z: TimeZone,
    {
        let mut excess = Duration::nanoseconds(i64::from(dt.nanosecond()));
        if !self.includes_seconds() {
            excess = excess + Duration::seconds(i64::from(dt.second()));
        }
        dt.clone() - excess
    }
}

/// Iterator over upcoming occurrences, see [`Schedule::iter_from`].
pub struct Occurrences<'a, Z>
where
    Z: TimeZone,
{
    is_done: bool,
    schedule: &'a Schedule,
    reference: DateTime<Z>,
    cursor: DateTime<Z>,
    steps_left: usize,
    give_up_after: Option<Duration>,
    found: usize,
}

impl<'a, Z> Occurrences<'a, Z>
where
    Z: TimeZone,
{
    fn new(schedule: &'a Schedule, reference: &DateTime<Z>, config: SearchConfig) -> Self {
        Occurrences {
            is_done: false,
            schedule,
            reference: reference.clone(),
            cursor: schedule.truncate(reference),
            steps_left: config.max_iterations,
            give_up_after: config.give_up_after_secs.map(|secs| {
                Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX).min(MAX_SECS))
            }),
            found: 0,
        }
    }

    fn gave_up(&self) -> bool {
        match &self.give_up_after {
            Some(limit) if self.found == 0 => self.cursor.clone() - self.reference.clone() > *limit,
            _ => false,
        }
    }
}

impl<'a, Z> Iterator for Occurrences<'a, Z>
where
    Z: TimeZone,
{
    type Item = DateTime<Z>;

    fn next(&mut self) -> Option<DateTime<Z>> {
        if self.is_done {
            return None;
        }
        let step = self.schedule.step();

        while self.steps_left > 0 {
            self.steps_left -= 1;
            self.cursor = match self.cursor.clone().checked_add_signed(step) {
                Some(next) => next,
                None => break,
            };

            if self.schedule.matches(&self.cursor) {
                self.found += 1;
                trace!(schedule = %self.schedule, occurrence = ?self.cursor, "found occurrence");
                return Some(self.cursor.clone());
            }
            if self.gave_up() {
                debug!(
                    schedule = %self.schedule,
                    reference = ?self.reference,
                    "no occurrence within the give up window"
                );
                self.is_done = true;
                return None;
            }
        }

        debug!(
            schedule = %self.schedule,
            found = self.found,
            "occurrence search budget exhausted"
        );
        self.is_done = true;
        None
    }
}
