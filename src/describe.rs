//! Natural-language descriptions of schedules.
//!
//! Well known expressions are looked up in a fixed table of canned phrases;
//! anything else is composed field by field.

use crate::errors::UnknownLocale;
use crate::field::{Field, FieldKind};
use crate::schedule::Schedule;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

/// Language descriptions are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts a bare language (`en`) or a region tagged one (`zh-CN`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_ref() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            _ => Err(UnknownLocale(s.into())),
        }
    }
}

struct Phrase {
    en: &'static str,
    zh: &'static str,
}

impl Phrase {
    fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en,
            Locale::Zh => self.zh,
        }
    }
}

const EVERY_MINUTE: Phrase = Phrase {
    en: "Every minute",
    zh: "每分钟执行",
};
const EVERY_SECOND: Phrase = Phrase {
    en: "Every second",
    zh: "每秒执行",
};

static CANNED: Lazy<HashMap<&'static str, Phrase>> = Lazy::new(|| {
    let table = [
        ("*/5 * * * *", "Every 5 minutes", "每5分钟执行"),
        ("*/10 * * * *", "Every 10 minutes", "每10分钟执行"),
        ("*/15 * * * *", "Every 15 minutes", "每15分钟执行"),
        ("*/30 * * * *", "Every 30 minutes", "每30分钟执行"),
        ("0 * * * *", "Every hour", "每小时执行"),
        ("0 */2 * * *", "Every 2 hours", "每2小时执行"),
        ("0 0 * * *", "Every day at midnight", "每天午夜执行"),
        ("0 12 * * *", "Every day at noon", "每天中午12点执行"),
        ("0 9 * * 1-5", "Weekdays at 9:00 AM", "工作日上午9点执行"),
        ("0 0 * * 0", "Every Sunday at midnight", "每周日午夜执行"),
        ("0 0 * * 1", "Every Monday at midnight", "每周一午夜执行"),
        (
            "0 0 1 * *",
            "On the first day of every month at midnight",
            "每月1号午夜执行",
        ),
        ("0 0 1 1 *", "Every year on January 1 at midnight", "每年1月1日午夜执行"),
    ];
    table
        .iter()
        .map(|&(expression, en, zh)| (expression, Phrase { en, zh }))
        .chain(std::iter::once(("* * * * *", EVERY_MINUTE)))
        .collect()
});

static CANNED_WITH_SECONDS: Lazy<HashMap<&'static str, Phrase>> = Lazy::new(|| {
    let table = [
        ("*/5 * * * * *", "Every 5 seconds", "每5秒执行"),
        ("*/10 * * * * *", "Every 10 seconds", "每10秒执行"),
        ("*/30 * * * * *", "Every 30 seconds", "每30秒执行"),
    ];
    table
        .iter()
        .map(|&(expression, en, zh)| (expression, Phrase { en, zh }))
        .chain(std::iter::once(("* * * * * *", EVERY_SECOND)))
        .collect()
});

static WEEKDAYS: Lazy<BTreeSet<u32>> = Lazy::new(|| (1..=5).collect());

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const EN_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const ZH_MONTHS: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月", "十二月",
];
const ZH_DAYS: [&str; 7] = ["周日", "周一", "周二", "周三", "周四", "周五", "周六"];

/// The fixed message shown in place of a description for an invalid expression.
pub fn invalid_expression(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Invalid cron expression",
        Locale::Zh => "无效的Cron表达式",
    }
}

/// Describes `source`, or returns the fixed invalid expression message when it
/// does not validate.
///
/// ```rust
/// use cron_insight::{describe, Locale};
///
/// assert_eq!("Every minute", describe("* * * * *", false, Locale::En));
/// assert_eq!("Runs at minute 30, at hour 9, on weekdays", describe("30 9 * * 1-5", false, Locale::En));
/// assert_eq!("Invalid cron expression", describe("61 * * * *", false, Locale::En));
/// ```
pub fn describe(source: &str, include_seconds: bool, locale: Locale) -> String {
    match Schedule::parse(source, include_seconds) {
        Ok(schedule) => schedule.describe(locale),
        Err(_) => invalid_expression(locale).to_string(),
    }
}

impl Schedule {
    pub fn describe(&self, locale: Locale) -> String {
        if let Some(phrase) = self.canned() {
            return phrase.get(locale).to_string();
        }

        let fragments: Vec<String> = self
            .fields()
            .filter(|field| field.kind() != FieldKind::Second || self.includes_seconds())
            .filter_map(|field| fragment(field, locale))
            .collect();

        if fragments.is_empty() {
            let every = if self.includes_seconds() {
                EVERY_SECOND
            } else {
                EVERY_MINUTE
            };
            return every.get(locale).to_string();
        }

        match locale {
            Locale::En => format!("Runs {}", fragments.join(", ")),
            Locale::Zh => format!("{}执行", fragments.join("，")),
        }
    }

    fn canned(&self) -> Option<&'static Phrase> {
        let key = self.as_str();
        if !self.includes_seconds() {
            return CANNED.get(key);
        }
        CANNED_WITH_SECONDS.get(key).or_else(|| match key.split_once(' ') {
            Some(("0", rest)) => CANNED.get(rest),
            _ => None,
        })
    }
}

fn fragment(field: &Field, locale: Locale) -> Option<String> {
    if field.is_wildcard() {
        return None;
    }
    let kind = field.kind();

    if let Some((base, step)) = field.token().split_once('/') {
        if let (false, Ok(step)) = (field.token().contains(','), step.parse::<u32>()) {
            return Some(step_fragment(kind, base, step, locale));
        }
    }

    if kind == FieldKind::DayOfWeek && *field.values() == *WEEKDAYS {
        return Some(
            match locale {
                Locale::En => "on weekdays",
                Locale::Zh => "工作日",
            }
            .to_string(),
        );
    }

    let list = render_list(kind, field.values(), locale);
    Some(match locale {
        Locale::En => match kind {
            FieldKind::Second => format!("at second {}", list),
            FieldKind::Minute => format!("at minute {}", list),
            FieldKind::Hour => format!("at hour {}", list),
            FieldKind::DayOfMonth => format!("on day {} of the month", list),
            FieldKind::Month | FieldKind::Year => format!("in {}", list),
            FieldKind::DayOfWeek => format!("on {}", list),
        },
        Locale::Zh => match kind {
            FieldKind::Second => format!("第{}秒", list),
            FieldKind::Minute => format!("第{}分钟", list),
            FieldKind::Hour => format!("{}点", list),
            FieldKind::DayOfMonth => format!("每月{}号", list),
            FieldKind::Month | FieldKind::DayOfWeek => list,
            FieldKind::Year => format!("{}年", list),
        },
    })
}

fn step_fragment(kind: FieldKind, base: &str, step: u32, locale: Locale) -> String {
    let every = match locale {
        Locale::En => match (step, unit(kind, locale)) {
            (1, (singular, _)) => format!("every {}", singular),
            (n, (_, plural)) => format!("every {} {}", n, plural),
        },
        Locale::Zh => match step {
            1 => format!("每{}", unit(kind, locale).0),
            n => format!("每{}{}", n, unit(kind, locale).0),
        },
    };

    let bounds = match base {
        "*" => None,
        _ => kind.expand(base).ok().and_then(|values| {
            let first = *values.iter().next()?;
            let last = *values.iter().next_back()?;
            Some((first, last))
        }),
    };
    match (bounds, base.contains('-')) {
        (None, _) => every,
        (Some((from, to)), true) => {
            let (from, to) = (value_name(kind, from, locale), value_name(kind, to, locale));
            match locale {
                Locale::En => format!("{} from {} through {}", every, from, to),
                Locale::Zh => format!("从{}到{}{}", from, to, every),
            }
        }
        (Some((from, _)), false) => {
            let from = value_name(kind, from, locale);
            match locale {
                Locale::En => format!("{} starting at {}", every, from),
                Locale::Zh => format!("从{}开始{}", from, every),
            }
        }
    }
}

fn unit(kind: FieldKind, locale: Locale) -> (&'static str, &'static str) {
    match locale {
        Locale::En => match kind {
            FieldKind::Second => ("second", "seconds"),
            FieldKind::Minute => ("minute", "minutes"),
            FieldKind::Hour => ("hour", "hours"),
            FieldKind::DayOfMonth | FieldKind::DayOfWeek => ("day", "days"),
            FieldKind::Month => ("month", "months"),
            FieldKind::Year => ("year", "years"),
        },
        Locale::Zh => match kind {
            FieldKind::Second => ("秒", "秒"),
            FieldKind::Minute => ("分钟", "分钟"),
            FieldKind::Hour => ("小时", "小时"),
            FieldKind::DayOfMonth | FieldKind::DayOfWeek => ("天", "天"),
            FieldKind::Month => ("个月", "个月"),
            FieldKind::Year => ("年", "年"),
        },
    }
}

fn value_name(kind: FieldKind, value: u32, locale: Locale) -> String {
    let names: Option<&[&str]> = match (kind, locale) {
        (FieldKind::Month, Locale::En) => Some(&EN_MONTHS[..]),
        (FieldKind::Month, Locale::Zh) => Some(&ZH_MONTHS[..]),
        (FieldKind::DayOfWeek, Locale::En) => Some(&EN_DAYS[..]),
        (FieldKind::DayOfWeek, Locale::Zh) => Some(&ZH_DAYS[..]),
        _ => None,
    };
    let index = (value - kind.min()) as usize;
    match names.and_then(|names| names.get(index)) {
        Some(name) => name.to_string(),
        None => value.to_string(),
    }
}

#[derive(Debug, PartialEq)]
enum Span {
    Single(u32),
    Range(u32, u32),
}

// runs of three or more consecutive values read better as a range
fn spans(values: &BTreeSet<u32>) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut iter = values.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        match end - start {
            0 => spans.push(Span::Single(start)),
            1 => {
                spans.push(Span::Single(start));
                spans.push(Span::Single(end));
            }
            _ => spans.push(Span::Range(start, end)),
        }
    }
    spans
}

fn render_list(kind: FieldKind, values: &BTreeSet<u32>, locale: Locale) -> String {
    let (through, separator) = match locale {
        Locale::En => (" through ", ", "),
        Locale::Zh => ("至", "、"),
    };
    spans(values)
        .into_iter()
        .map(|span| match span {
            Span::Single(v) => value_name(kind, v, locale),
            Span::Range(from, to) => format!(
                "{}{}{}",
                value_name(kind, from, locale),
                through,
                value_name(kind, to, locale)
            ),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(expression: &str) -> String {
        Schedule::parse(expression, false).unwrap().describe(Locale::En)
    }

    fn zh(expression: &str) -> String {
        Schedule::parse(expression, false).unwrap().describe(Locale::Zh)
    }

    #[test]
    fn canned_phrase_takes_precedence() {
        assert_eq!("Every minute", en("* * * * *"));
        assert_eq!("每分钟执行", zh("* * * * *"));
        assert_eq!("Weekdays at 9:00 AM", en("0 9 * * 1-5"));
        assert_eq!("Every day at midnight", en("0   0 * * *"));
    }

    #[test]
    fn canned_phrases_with_seconds() {
        let describe = |s: &str| Schedule::parse(s, true).unwrap().describe(Locale::En);
        assert_eq!("Every second", describe("* * * * * *"));
        assert_eq!("Every 5 seconds", describe("*/5 * * * * *"));
        assert_eq!("Every hour", describe("0 0 * * * *"));
        assert_eq!("Runs at second 30, every minute", describe("30 */1 * * * *"));
    }

    #[test]
    fn year_field_is_not_mistaken_for_seconds() {
        assert_eq!("Runs in 2030", en("* * * * * 2030"));
        assert_eq!("Every minute", en("* * * * * *"));
    }

    #[test]
    fn composes_fields_in_order() {
        assert_eq!("Runs at minute 30, at hour 9, on weekdays", en("30 9 * * 1-5"));
        assert_eq!("第30分钟，9点，工作日执行", zh("30 9 * * MON-FRI"));
        assert_eq!(
            "Runs at minute 0, at hour 0, on day 1, 15 of the month",
            en("0 0 1,15 * *")
        );
        assert_eq!(
            "Runs at minute 0, at hour 12, in January through March, on Monday, Wednesday",
            en("0 12 * JAN-MAR MON,WED")
        );
        assert_eq!(
            "第0分钟，12点，一月至三月，周一、周三执行",
            zh("0 12 * JAN-MAR MON,WED")
        );
        assert_eq!("Runs at minute 5, in 2030 through 2032", en("5 * * * * 2030-2032"));
    }

    #[test]
    fn describes_steps() {
        assert_eq!("Runs every 20 minutes", en("*/20 * * * *"));
        assert_eq!("每20分钟执行", zh("*/20 * * * *"));
        assert_eq!("Runs at minute 0, every 3 hours", en("0 */3 * * *"));
        assert_eq!(
            "Runs at minute 0, every 2 hours from 8 through 18",
            en("0 8-18/2 * * *")
        );
        assert_eq!("Runs every 15 minutes starting at 15", en("15/15 * * * *"));
        assert_eq!("从15开始每15分钟执行", zh("15/15 * * * *"));
        assert_eq!(
            "Runs at minute 0, at hour 0, on day 1 of the month, every 3 months from January through October",
            en("0 0 1 JAN-OCT/3 *")
        );
    }

    #[test]
    fn step_with_list_is_rendered_as_values() {
        assert_eq!("Runs at minute 0, 30, 45", en("*/30,45 * * * *"));
        assert_eq!("Runs at minute 0 through 2, 30", en("0-2,30 * * * *"));
    }

    #[test]
    fn weekdays_shorthand_needs_exactly_monday_to_friday() {
        assert_eq!("Runs at minute 0, at hour 8, on weekdays", en("0 8 * * 1,2,3,4,5"));
        assert_eq!(
            "Runs at minute 0, at hour 8, on Monday through Thursday",
            en("0 8 * * 1-4")
        );
        assert_eq!(
            "Runs at minute 0, at hour 8, on Sunday, Saturday",
            en("0 8 * * 6,7")
        );
    }

    #[test]
    fn both_day_fields() {
        assert_eq!(
            "Runs at minute 0, at hour 0, on day 1 of the month, on Monday",
            en("0 0 1 * 1")
        );
    }

    #[test]
    fn describe_invalid_expression() {
        assert_eq!("Invalid cron expression", describe("* * *", false, Locale::En));
        assert_eq!("无效的Cron表达式", describe("99 * * * *", false, Locale::Zh));
        assert_eq!("Every minute", describe("* * * * *", false, Locale::En));
    }

    #[test]
    fn locale_from_str() {
        assert_eq!(Ok(Locale::En), "en".parse());
        assert_eq!(Ok(Locale::En), "en-US".parse());
        assert_eq!(Ok(Locale::Zh), "zh_CN".parse());
        assert_eq!(Ok(Locale::Zh), "ZH".parse());
        assert_eq!(
            Err(UnknownLocale("fr".into())),
            "fr".parse::<Locale>()
        );
        assert_eq!(Locale::En, Locale::default());
    }

    #[test]
    fn spans_collapse_runs() {
        let values: BTreeSet<u32> = [1, 2, 4, 5, 6, 9].iter().copied().collect();
        assert_eq!(
            vec![
                Span::Single(1),
                Span::Single(2),
                Span::Range(4, 6),
                Span::Single(9)
            ],
            spans(&values)
        );
    }
}
