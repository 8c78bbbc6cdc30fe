use chrono::{TimeZone, Utc};
use cron_insight::{Locale, Schedule, SearchConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let expressions = [
        ("30 9,12,15 1,15 May-Aug Mon,Wed,Fri", false),
        ("*/20 * * * * *", true),
        ("0 0 31 2 *", false),
        ("61 25 * * *", false),
    ];
    let from_date = Utc.with_ymd_and_hms(2022, 6, 1, 8, 40, 1).unwrap();
    let config = SearchConfig::default()
        .with_max_iterations(60 * 24 * 31)
        .without_give_up();

    for (expression, include_seconds) in expressions.iter() {
        println!("{}", expression);
        let schedule = match Schedule::parse(expression, *include_seconds) {
            Ok(schedule) => schedule,
            Err(report) => {
                for err in report.errors.iter() {
                    println!("  error   -> {}", err);
                }
                println!();
                continue;
            }
        };

        println!("  en      -> {}", schedule.describe(Locale::En));
        println!("  zh      -> {}", schedule.describe(Locale::Zh));
        for warning in schedule.warnings() {
            println!("  warning -> {}", warning);
        }

        let upcoming = schedule.next_occurrences_with(&from_date, 5, config);
        if upcoming.is_empty() {
            println!("  no upcoming fire times found");
        }
        for datetime in upcoming {
            println!("  next    -> {:?}", datetime);
        }
        println!();
    }
}

// 30 9,12,15 1,15 May-Aug Mon,Wed,Fri
//   en      -> Runs at minute 30, at hour 9, 12, 15, on day 1, 15 of the month, in May through August, on Monday, Wednesday, Friday
//   zh      -> 第30分钟，9、12、15点，每月1、15号，五月至八月，周一、周三、周五执行
//   warning -> both day of month and day of week are restricted, a day runs when either one matches
//   next    -> 2022-06-01T09:30:00Z
//   next    -> 2022-06-01T12:30:00Z
//   next    -> 2022-06-01T15:30:00Z
//   next    -> 2022-06-03T09:30:00Z
//   next    -> 2022-06-03T12:30:00Z
//
// */20 * * * * *
//   en      -> Runs every 20 seconds
//   zh      -> 每20秒执行
//   next    -> 2022-06-01T08:40:20Z
//   next    -> 2022-06-01T08:40:40Z
//   next    -> 2022-06-01T08:41:00Z
//   next    -> 2022-06-01T08:41:20Z
//   next    -> 2022-06-01T08:41:40Z
//
// 0 0 31 2 *
//   en      -> Runs at minute 0, at hour 0, on day 31 of the month, in February
//   zh      -> 第0分钟，0点，每月31号，二月执行
//   no upcoming fire times found
//
// 61 25 * * *
//   error   -> Invalid minute '61': 61 is out of range, expected 0-59
//   error   -> Invalid hour '25': 25 is out of range, expected 0-23
