use chrono::{NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use seam_core::{DataSlice, Symbol};

use super::bars::flat_bar;

/// Daily closes for the fixture symbols, stamped at 16:00 New York time.
pub fn by_symbol(s: &str) -> Option<Vec<DataSlice>> {
    match s {
        "ABC" => Some(build(
            s,
            &[
                ("2023-01-03", "141"),
                ("2023-01-04", "142"),
                ("2023-01-05", "140"),
                ("2023-01-06", "144"),
            ],
        )),
        "XYZ" => Some(build(
            s,
            &[
                ("2023-01-03", "244"),
                ("2023-01-04", "245"),
                ("2023-01-05", "243"),
                ("2023-01-06", "247"),
            ],
        )),
        _ => None,
    }
}

fn close_time(date: &str, tz: Tz) -> chrono::DateTime<chrono::Utc> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(16, 0, 0).unwrap())
        .and_local_timezone(tz)
        .unwrap()
        .to_utc()
}

fn build(symbol: &str, rows: &[(&str, &str)]) -> Vec<DataSlice> {
    let symbol = Symbol::new(symbol).unwrap();
    rows.iter()
        .map(|&(date, close)| {
            let at = close_time(date, New_York);
            let close: Decimal = close.parse().unwrap();
            DataSlice::new(at).with_entry(symbol.clone(), flat_bar(at, TimeDelta::days(1), close))
        })
        .collect()
}
