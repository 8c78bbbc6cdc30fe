use crate::errors::ExpandError;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

const MIN_YEAR: u32 = 1970;
const MAX_YEAR: u32 = 2099;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAY_OF_WEEK_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// One positional slot of a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Second,
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::DayOfMonth,
        FieldKind::Month,
        FieldKind::DayOfWeek,
        FieldKind::Year,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Second => "second",
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "dayOfMonth",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "dayOfWeek",
            FieldKind::Year => "year",
        }
    }

    pub fn min(self) -> u32 {
        match self {
            FieldKind::Second | FieldKind::Minute | FieldKind::Hour | FieldKind::DayOfWeek => 0,
            FieldKind::DayOfMonth | FieldKind::Month => 1,
            FieldKind::Year => MIN_YEAR,
        }
    }

    pub fn max(self) -> u32 {
        match self {
            FieldKind::Second | FieldKind::Minute => 59,
            FieldKind::Hour => 23,
            FieldKind::DayOfMonth => 31,
            FieldKind::Month => 12,
            FieldKind::DayOfWeek => 6,
            FieldKind::Year => MAX_YEAR,
        }
    }

    /// Whether `token` means "any value" for this field.
    pub fn is_wildcard(self, token: &str) -> bool {
        match self {
            FieldKind::DayOfMonth | FieldKind::DayOfWeek => token == "*" || token == "?",
            _ => token == "*",
        }
    }

    fn names(self) -> Option<(&'static [&'static str], u32)> {
        match self {
            FieldKind::Month => Some((&MONTH_NAMES[..], 1)),
            FieldKind::DayOfWeek => Some((&DAY_OF_WEEK_NAMES[..], 0)),
            _ => None,
        }
    }

    /// Expands `token` the way this field reads it: `?` as a wildcard on the
    /// day fields, month and weekday names, and weekday `7` folded onto Sunday.
    pub fn expand(self, token: &str) -> Result<BTreeSet<u32>, ExpandError> {
        if self.is_wildcard(token) {
            return expand("*", self.min(), self.max());
        }
        let token = self.substitute_names(token)?;
        match self {
            FieldKind::DayOfWeek => {
                let values = expand(&token, 0, 7)?;
                Ok(values.into_iter().map(|v| v % 7).collect())
            }
            _ => expand(&token, self.min(), self.max()),
        }
    }

    fn substitute_names<'a>(self, token: &'a str) -> Result<Cow<'a, str>, ExpandError> {
        let (names, offset) = match self.names() {
            Some(names) => names,
            None => return Ok(Cow::Borrowed(token)),
        };
        if !token.chars().any(|c| c.is_ascii_alphabetic()) {
            return Ok(Cow::Borrowed(token));
        }

        let mut out = String::with_capacity(token.len());
        let mut word = String::new();
        for c in token.chars().chain(std::iter::once(',')) {
            if c.is_ascii_alphabetic() {
                word.push(c);
                continue;
            }
            if !word.is_empty() {
                let upper = word.to_ascii_uppercase();
                let index = names
                    .iter()
                    .position(|n| *n == upper)
                    .ok_or_else(|| ExpandError::UnknownName(word.clone()))?;
                out.push_str(&(index as u32 + offset).to_string());
                word.clear();
            }
            out.push(c);
        }
        out.pop();
        Ok(Cow::Owned(out))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Second => "second",
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day of month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day of week",
            FieldKind::Year => "year",
        })
    }
}

/// A field token together with the concrete values it denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    kind: FieldKind,
    token: String,
    values: BTreeSet<u32>,
}

impl Field {
    pub(crate) fn parse(kind: FieldKind, token: &str) -> Result<Self, ExpandError> {
        Ok(Field {
            kind,
            token: token.to_string(),
            values: kind.expand(token)?,
        })
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The expanded values in ascending order.
    pub fn values(&self) -> &BTreeSet<u32> {
        &self.values
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind.is_wildcard(&self.token)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.values.contains(&value)
    }
}

/// Expands a single cron field token into the sorted set of values it denotes
/// within `[min, max]`.
///
/// Supports `*`, comma lists, `a-b` ranges, bare numbers and `base/step` where
/// base is `*`, `a-b` or `a` (meaning `a-max`). A step keeps the values whose
/// offset from `min` is a multiple of it.
///
/// ```rust
/// use cron_insight::expand;
///
/// let values = expand("*/15", 0, 59).unwrap();
/// assert_eq!(vec![0, 15, 30, 45], values.into_iter().collect::<Vec<_>>());
/// ```
pub fn expand(token: &str, min: u32, max: u32) -> Result<BTreeSet<u32>, ExpandError> {
    if !token.contains(',') {
        return expand_item(token, min, max);
    }

    let mut set = BTreeSet::new();
    for item in token.split(',') {
        if item.is_empty() {
            return Err(ExpandError::EmptyListItem(token.into()));
        }
        if item == token {
            return Err(ExpandError::SelfReferentialList(token.into()));
        }
        set.extend(expand_item(item, min, max)?);
    }
    Ok(set)
}

fn expand_item(item: &str, min: u32, max: u32) -> Result<BTreeSet<u32>, ExpandError> {
    let mut step_iter = item.splitn(2, '/');
    let base = step_iter.next().unwrap_or_default();
    let step = step_iter.next();

    match step {
        Some(step) => {
            let step = parse_step(step)?;
            let (start, end) = match base {
                "*" => (min, max),
                _ if base.contains('-') => parse_range(base, min, max)?,
                _ => (parse_value(base, min, max)?, max),
            };
            let set: BTreeSet<u32> = (start..=end).filter(|v| (v - min) % step == 0).collect();
            if set.is_empty() {
                return Err(ExpandError::NoValues(item.into()));
            }
            Ok(set)
        }
        None => match base {
            "*" => Ok((min..=max).collect()),
            _ if base.contains('-') => {
                let (start, end) = parse_range(base, min, max)?;
                Ok((start..=end).collect())
            }
            _ => Ok(std::iter::once(parse_value(base, min, max)?).collect()),
        },
    }
}

fn parse_step(s: &str) -> Result<u32, ExpandError> {
    match s.parse::<u32>() {
        Ok(step) if step > 0 => Ok(step),
        _ => Err(ExpandError::InvalidStep(s.into())),
    }
}

fn parse_range(s: &str, min: u32, max: u32) -> Result<(u32, u32), ExpandError> {
    let mut dash_iter = s.splitn(2, '-');
    let left = dash_iter.next().unwrap_or_default();
    let right = dash_iter.next().unwrap_or_default();

    let start = parse_value(left, min, max)?;
    let end = parse_value(right, min, max)?;
    if start > end {
        return Err(ExpandError::InvertedRange { start, end });
    }
    Ok((start, end))
}

fn parse_value(s: &str, min: u32, max: u32) -> Result<u32, ExpandError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(if s.contains(['*', '/', '-']) {
            ExpandError::Unsupported(s.into())
        } else {
            ExpandError::NotANumber(s.into())
        });
    }
    let value = s
        .parse::<u32>()
        .map_err(|_| ExpandError::NotANumber(s.into()))?;
    if value < min || value > max {
        return Err(ExpandError::OutOfRange { value, min, max });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: impl IntoIterator<Item = u32>) -> BTreeSet<u32> {
        values.into_iter().collect()
    }

    #[test]
    fn expand_wildcard_is_complete() {
        for kind in FieldKind::ALL {
            let values = kind.expand("*").unwrap();
            assert_eq!((kind.max() - kind.min() + 1) as usize, values.len());
            assert_eq!(Some(&kind.min()), values.iter().next());
            assert_eq!(Some(&kind.max()), values.iter().next_back());
        }
    }

    #[test]
    fn expand_single_and_range() {
        assert_eq!(Ok(set([5])), expand("5", 0, 59));
        assert_eq!(Ok(set(0..=58)), expand("0-58", 0, 59));
        assert_eq!(Ok(set(1..=30)), expand("1-30", 1, 31));
        assert_eq!(Ok(set([9])), expand("9-9", 0, 23));
    }

    #[test]
    fn expand_list_is_sorted_and_deduplicated() {
        assert_eq!(Ok(set([0, 1, 2, 3, 30, 45])), expand("45,30,0-3,2,30", 0, 59));
    }

    #[test]
    fn expand_step() {
        let values: Vec<u32> = expand("*/5", 0, 59).unwrap().into_iter().collect();
        assert_eq!(0, values[0]);
        assert_eq!(12, values.len());
        assert!(values.windows(2).all(|w| w[1] - w[0] == 5));

        assert_eq!(Ok(set((0..=59).step_by(2))), expand("0-59/2", 0, 59));
        // offsets are measured from the field minimum, not the range start
        assert_eq!(Ok(set([10, 20])), expand("5-20/10", 0, 59));
        assert_eq!(Ok(set([15, 30, 45])), expand("5/15", 0, 59));
        assert_eq!(Ok(set([1, 4, 7, 10])), expand("*/3", 1, 12));
    }

    #[test]
    fn expand_invalid() {
        assert_eq!(
            Err(ExpandError::NotANumber("invalid".into())),
            expand("invalid", 0, 59)
        );
        assert_eq!(
            Err(ExpandError::OutOfRange {
                value: 60,
                min: 0,
                max: 59
            }),
            expand("60", 0, 59)
        );
        assert_eq!(
            Err(ExpandError::InvertedRange { start: 30, end: 10 }),
            expand("30-10", 0, 59)
        );
        assert_eq!(
            Err(ExpandError::OutOfRange {
                value: 0,
                min: 1,
                max: 31
            }),
            expand("0-10", 1, 31)
        );
        assert_eq!(Err(ExpandError::NotANumber("".into())), expand("5-", 0, 59));
        assert_eq!(Err(ExpandError::InvalidStep("0".into())), expand("*/0", 0, 59));
        assert_eq!(Err(ExpandError::InvalidStep("-2".into())), expand("*/-2", 0, 59));
        assert_eq!(Err(ExpandError::InvalidStep("x".into())), expand("*/x", 0, 59));
        assert_eq!(Err(ExpandError::NoValues("1-4/5".into())), expand("1-4/5", 0, 59));
        assert_eq!(
            Err(ExpandError::EmptyListItem("1,,2".into())),
            expand("1,,2", 0, 59)
        );
        assert_eq!(Err(ExpandError::EmptyListItem(",".into())), expand(",", 0, 59));
        assert_eq!(Err(ExpandError::InvalidStep("5/2".into())), expand("*/5/2", 0, 59));
        assert_eq!(Err(ExpandError::Unsupported("*-2".into())), expand("1-*-2", 0, 59));
        assert_eq!(Err(ExpandError::NotANumber("L".into())), expand("L", 1, 31));
    }

    #[test]
    fn expand_range_invariant() {
        let tokens = ["*", "*/7", "3-9", "1,2,50", "10/4", "0-59/13", "59"];
        for token in tokens.iter() {
            for v in expand(token, 0, 59).unwrap() {
                assert!(v <= 59, "{} produced {}", token, v);
            }
        }
        for v in FieldKind::DayOfMonth.expand("*/10").unwrap() {
            assert!((1..=31).contains(&v));
        }
    }

    #[test]
    fn month_names() {
        assert_eq!(Ok(set(1..=12)), FieldKind::Month.expand("JAN-DEC"));
        assert_eq!(Ok(set(2..=4)), FieldKind::Month.expand("feb-Apr"));
        assert_eq!(Ok(set([3, 11])), FieldKind::Month.expand("2-APR/2,NOV"));
        assert_eq!(
            Err(ExpandError::UnknownName("Foo".into())),
            FieldKind::Month.expand("Foo")
        );
        assert_eq!(
            Err(ExpandError::NotANumber("MAY".into())),
            FieldKind::Hour.expand("MAY")
        );
    }

    #[test]
    fn day_of_week_sunday_folding() {
        assert_eq!(Ok(set([0])), FieldKind::DayOfWeek.expand("7"));
        assert_eq!(Ok(set(0..=6)), FieldKind::DayOfWeek.expand("1-7"));
        assert_eq!(Ok(set([0, 6])), FieldKind::DayOfWeek.expand("Sat,Sun"));
        assert_eq!(Ok(set(1..=5)), FieldKind::DayOfWeek.expand("MON-FRI"));
        assert_eq!(Ok(set(0..=6)), FieldKind::DayOfWeek.expand("?"));
        assert!(FieldKind::DayOfWeek.expand("8").is_err());
    }

    #[test]
    fn question_mark_only_on_day_fields() {
        assert!(FieldKind::DayOfMonth.is_wildcard("?"));
        assert!(FieldKind::DayOfWeek.is_wildcard("?"));
        assert!(!FieldKind::Minute.is_wildcard("?"));
        assert!(FieldKind::Minute.expand("?").is_err());
        assert!(!FieldKind::Minute.is_wildcard("*/5"));
    }
}
