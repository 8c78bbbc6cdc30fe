use crate::errors::{ValidationError, ValidationReport, Warning};
use crate::field::{Field, FieldKind};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Represents a validated CRON expression.
///
/// A `Schedule` can only be obtained from an expression without errors, and is
/// immutable afterwards so it can be matched and searched any number of times.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Schedule {
    source: String,
    include_seconds: bool,
    seconds: Field,
    minutes: Field,
    hours: Field,
    days_of_month: Field,
    months: Field,
    days_of_week: Field,
    years: Option<Field>,
    warnings: Vec<Warning>,
}

impl Schedule {
    /// Parses `source` as a 5 field crontab expression, or a 6 field one with
    /// leading seconds when `include_seconds` is set. Either form accepts a
    /// trailing year.
    ///
    /// All field problems are collected into the returned report rather than
    /// stopping at the first one.
    ///
    /// ```rust
    /// use cron_insight::{FieldKind, Schedule};
    ///
    /// let report = Schedule::parse("60 * * * 9", false).unwrap_err();
    /// let fields: Vec<_> = report.errors.iter().filter_map(|e| e.field()).collect();
    /// assert_eq!(vec![FieldKind::Minute, FieldKind::DayOfWeek], fields);
    /// ```
    pub fn parse(source: &str, include_seconds: bool) -> Result<Schedule, ValidationReport> {
        match build(source, include_seconds) {
            (Some(schedule), _) => Ok(schedule),
            (None, report) => Err(report),
        }
    }

    /// Validates `source` without keeping the schedule, returning errors and
    /// warnings together.
    pub fn validate(source: &str, include_seconds: bool) -> ValidationReport {
        build(source, include_seconds).1
    }

    /// Whether the given instant satisfies the expression.
    ///
    /// Day of month and day of week combine the way cron does it: when both are
    /// restricted a day matches if *either* one matches.
    pub fn matches<Z>(&self, dt: &DateTime<Z>) -> bool
    where
        Z: TimeZone,
    {
        if self.include_seconds && !self.seconds.contains(dt.second()) {
            return false;
        }
        if !self.minutes.contains(dt.minute())
            || !self.hours.contains(dt.hour())
            || !self.months.contains(dt.month())
        {
            return false;
        }
        if let Some(years) = self.years.as_ref().filter(|y| !y.is_wildcard()) {
            match u32::try_from(dt.year()) {
                Ok(year) if years.contains(year) => {}
                _ => return false,
            }
        }
        self.day_matches(dt.day(), dt.weekday().num_days_from_sunday())
    }

    fn day_matches(&self, day_of_month: u32, day_of_week: u32) -> bool {
        match (
            self.days_of_month.is_wildcard(),
            self.days_of_week.is_wildcard(),
        ) {
            (true, true) => true,
            (false, true) => self.days_of_month.contains(day_of_month),
            (true, false) => self.days_of_week.contains(day_of_week),
            (false, false) => {
                self.days_of_month.contains(day_of_month) || self.days_of_week.contains(day_of_week)
            }
        }
    }

    /// The expression with its fields separated by single spaces.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn includes_seconds(&self) -> bool {
        self.include_seconds
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the field for `kind`. The second field is always present; without
    /// seconds it is the implied `0`. The year field is only present when given.
    pub fn field(&self, kind: FieldKind) -> Option<&Field> {
        match kind {
            FieldKind::Second => Some(&self.seconds),
            FieldKind::Minute => Some(&self.minutes),
            FieldKind::Hour => Some(&self.hours),
            FieldKind::DayOfMonth => Some(&self.days_of_month),
            FieldKind::Month => Some(&self.months),
            FieldKind::DayOfWeek => Some(&self.days_of_week),
            FieldKind::Year => self.years.as_ref(),
        }
    }

    /// Fields in expression order, second first and year last when present.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        FieldKind::ALL
            .into_iter()
            .filter_map(move |kind| self.field(kind))
    }
}

fn build(source: &str, include_seconds: bool) -> (Option<Schedule>, ValidationReport) {
    let tokens: Vec<&str> = source.split_whitespace().collect();
    let mut report = ValidationReport::default();

    let expected = if include_seconds { 6 } else { 5 };
    if tokens.len() != expected && tokens.len() != expected + 1 {
        debug!(expected, found = tokens.len(), "cron expression has wrong arity");
        report.errors.push(ValidationError::Arity {
            expected,
            found: tokens.len(),
        });
        return (None, report);
    }

    let (second, rest) = if include_seconds {
        (tokens[0], &tokens[1..])
    } else {
        ("0", &tokens[..])
    };

    let mut field = |kind: FieldKind, token: &str| match Field::parse(kind, token) {
        Ok(field) => Some(field),
        Err(reason) => {
            report.errors.push(ValidationError::Field {
                field: kind,
                token: token.to_string(),
                reason,
            });
            None
        }
    };
    let seconds = field(FieldKind::Second, second);
    let minutes = field(FieldKind::Minute, rest[0]);
    let hours = field(FieldKind::Hour, rest[1]);
    let days_of_month = field(FieldKind::DayOfMonth, rest[2]);
    let months = field(FieldKind::Month, rest[3]);
    let days_of_week = field(FieldKind::DayOfWeek, rest[4]);
    let years = rest.get(5).and_then(|token| field(FieldKind::Year, token));

    if !FieldKind::DayOfMonth.is_wildcard(rest[2]) && !FieldKind::DayOfWeek.is_wildcard(rest[4]) {
        report.warnings.push(Warning::DayFieldsCombined);
    }

    if !report.is_valid() {
        debug!(
            expression = source,
            errors = report.errors.len(),
            "cron expression failed validation"
        );
        return (None, report);
    }

    match (seconds, minutes, hours, days_of_month, months, days_of_week) {
        (
            Some(seconds),
            Some(minutes),
            Some(hours),
            Some(days_of_month),
            Some(months),
            Some(days_of_week),
        ) => {
            let schedule = Schedule {
                source: tokens.join(" "),
                include_seconds,
                seconds,
                minutes,
                hours,
                days_of_month,
                months,
                days_of_week,
                years,
                warnings: report.warnings.clone(),
            };
            (Some(schedule), report)
        }
        _ => (None, report),
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parses with the precision inferred from the field count: 5 fields for
/// crontab, 6 or 7 for seconds with an optional year.
impl FromStr for Schedule {
    type Err = ValidationReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_whitespace().count() {
            6 | 7 => Schedule::parse(s, true),
            _ => Schedule::parse(s, false),
        }
    }
}
