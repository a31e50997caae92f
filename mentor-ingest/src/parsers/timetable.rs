//! Timetable export parser (CSV).
//!
//! Expected columns, header row included:
//!   date,hours
//!
//! One row per commitment (class, shift, practice). Several rows may share
//! a date; the allocator sums them per day.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

use mentor_core::BusySlot;

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .with_context(|| format!("bad timetable date: {raw}"))
}

/// Parse a timetable CSV file.
pub fn parse_timetable_csv(path: impl AsRef<Path>) -> Result<Vec<BusySlot>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_timetable_reader(file)
}

/// Parse timetable rows from any reader.
pub fn parse_timetable_reader<R: Read>(reader: R) -> Result<Vec<BusySlot>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut slots = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 2;

        let date_raw = record.get(0).unwrap_or("").trim();
        if date_raw.is_empty() {
            continue;
        }
        let date = parse_date(date_raw).with_context(|| format!("timetable row {row}"))?;

        let hours_raw = record.get(1).unwrap_or("").trim();
        let hours: f64 = hours_raw
            .parse()
            .with_context(|| format!("timetable row {row}: bad hours '{hours_raw}'"))?;
        if hours < 0.0 {
            bail!("timetable row {row}: negative hours");
        }

        slots.push(BusySlot { date, hours });
    }

    Ok(slots)
}
