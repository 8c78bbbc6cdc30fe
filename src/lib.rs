//! # Cron Insight
//!
//! Is a CRON expression validator, matcher and explorer, with plain language
//! descriptions.
//!
//! Expressions have 5 fields for Crontab, or 6 when seconds are enabled, and
//! both forms accept a trailing year. Every field problem is reported at once
//! so an editor can show them all next to the expression.
//!
//! The following Syntax is supported:
//! - \* any value (`?` also works for day of month and day of week)
//! - , value list
//! - \- range values
//! - / step values, counted from the lowest value of the field
//! - `JAN`-`DEC` and `SUN`-`SAT` names, with `7` also meaning Sunday
//!
//! When both day of month and day of week are restricted a day runs when
//! *either* one matches, as in Vixie CRON.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cron_insight::{Locale, Schedule};
//! //               min   hour   day of month   month   day of week
//! let expression = "30   9,12      1,15         May-Aug     *";
//!
//! let schedule = Schedule::parse(expression, false).unwrap();
//! let from_date = Utc.with_ymd_and_hms(2022, 6, 1, 8, 40, 1).unwrap();
//!
//! let upcoming = schedule.next_occurrences(&from_date, 3);
//! assert_eq!(
//!     vec![
//!         Utc.with_ymd_and_hms(2022, 6, 1, 9, 30, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2022, 6, 1, 12, 30, 0).unwrap(),
//!     ],
//!     upcoming
//! );
//! assert_eq!(
//!     "Runs at minute 30, at hour 9, 12, on day 1, 15 of the month, in May through August",
//!     schedule.describe(Locale::En)
//! );
//!
//! let report = Schedule::validate("0 25 * * MON-FOO", false);
//! assert_eq!(2, report.errors.len());
//! ```
//!
//! The default search takes at most 1000 steps and gives up when nothing has
//! matched for a day, so sparse schedules may need a larger [`SearchConfig`].
mod debounce;
mod describe;
mod errors;
mod field;
mod schedule;
mod search;

#[doc(inline)]
pub use errors::{ExpandError, UnknownLocale, ValidationError, ValidationReport, Warning};

#[doc(inline)]
pub use field::{expand, Field, FieldKind};

#[doc(inline)]
pub use schedule::Schedule;

#[doc(inline)]
pub use search::{Occurrences, SearchConfig, DEFAULT_GIVE_UP_AFTER_SECS, DEFAULT_MAX_ITERATIONS};

#[doc(inline)]
pub use describe::{describe, invalid_expression, Locale};

#[doc(inline)]
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
