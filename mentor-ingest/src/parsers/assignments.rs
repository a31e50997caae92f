//! Assignment export parser (CSV).
//!
//! Expected columns, header row included:
//!   title,due,estimated_hours,priority
//!
//! The `due` column is whatever the portal emitted. Seen in the wild and
//! handled here:
//!   2026-03-04                  plain date
//!   2026-03-03 23:59            local datetime (the campus timezone)
//!   2026-03-07T04:59:00Z        UTC/offset datetime, converted to local
//!   03/10/2026                  US date
//!   Mar 6 / March 6, 2026       month name, year inferred when missing

use anyhow::{bail, Context, Result};
use chrono::{Datelike, DateTime, Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use regex::Regex;
use std::io::Read;
use std::path::Path;

use mentor_core::{TaskPriority, WorkItem};

const MONTHS: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Regex-dispatched due-date parser. Built once per file; every row goes
/// through [`DueDateParser::parse`].
struct DueDateParser {
    iso_date: Regex,
    offset_datetime: Regex,
    local_datetime: Regex,
    us_date: Regex,
    month_name: Regex,
    tz: Tz,
    today: NaiveDate,
}

impl DueDateParser {
    fn new(tz: Tz, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            iso_date: Regex::new(r"^\d{4}-\d{2}-\d{2}$")?,
            offset_datetime: Regex::new(
                r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:?\d{2})$",
            )?,
            local_datetime: Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(:\d{2})?$")?,
            us_date: Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$")?,
            month_name: Regex::new(
                r"^(?P<mon>[A-Za-z]{3,9})\.?\s+(?P<day>\d{1,2})(?:,?\s+(?P<year>\d{4}))?$",
            )?,
            tz,
            today,
        })
    }

    fn parse(&self, raw: &str) -> Result<NaiveDate> {
        let raw = raw.trim();

        if self.iso_date.is_match(raw) {
            return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("bad date: {raw}"));
        }

        if self.offset_datetime.is_match(raw) {
            // Portal timestamps come in UTC or with an offset; the date that
            // matters is the one in the campus timezone.
            let instant = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("bad timestamp: {raw}"))?;
            return Ok(instant.with_timezone(&self.tz).date_naive());
        }

        if self.local_datetime.is_match(raw) {
            let normalized = raw.replacen('T', " ", 1);
            let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M")
                .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S"))
                .with_context(|| format!("bad local datetime: {raw}"))?;
            return Ok(naive.date());
        }

        if self.us_date.is_match(raw) {
            return NaiveDate::parse_from_str(raw, "%m/%d/%Y")
                .with_context(|| format!("bad date: {raw}"));
        }

        if let Some(caps) = self.month_name.captures(raw) {
            let month = month_number(&caps["mon"])
                .with_context(|| format!("unknown month in: {raw}"))?;
            let day: u32 = caps["day"].parse().with_context(|| format!("bad day in: {raw}"))?;
            let year = match caps.name("year") {
                Some(y) => y.as_str().parse::<i32>()?,
                None => self.infer_year(month, day)?,
            };
            return NaiveDate::from_ymd_opt(year, month, day)
                .with_context(|| format!("no such date: {raw}"));
        }

        bail!("unrecognized due date format: {raw}")
    }

    /// Year-less dates mean "the upcoming one": take the current year, and
    /// roll forward when that lands more than six months in the past.
    /// Recently-overdue work keeps its real (past) date this way.
    fn infer_year(&self, month: u32, day: u32) -> Result<i32> {
        let year = self.today.year();
        let candidate = NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("no such date: month {month} day {day}"))?;
        if candidate < self.today - Duration::days(180) {
            Ok(year + 1)
        } else {
            Ok(year)
        }
    }
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, number)| *number)
}

/// Parse a single due-date cell, accepting the same formats as the
/// assignment CSV reader.
pub fn parse_due_date(raw: &str, tz: Tz, today: NaiveDate) -> Result<NaiveDate> {
    DueDateParser::new(tz, today)?.parse(raw)
}

fn parse_priority(raw: &str) -> TaskPriority {
    match raw.trim().to_lowercase().as_str() {
        "low" => TaskPriority::Low,
        "high" => TaskPriority::High,
        // Unlabeled or unrecognized rows schedule fine as medium.
        _ => TaskPriority::Medium,
    }
}

/// Parse an assignments CSV file.
pub fn parse_assignments_csv(
    path: impl AsRef<Path>,
    tz: Tz,
    today: NaiveDate,
) -> Result<Vec<WorkItem>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_assignments_reader(file, tz, today)
}

/// Parse assignments from any reader. Blank and title-less rows are
/// skipped; a malformed due date or hours cell is an error that names the
/// row, since silently dropping an assignment would falsify the schedule.
pub fn parse_assignments_reader<R: Read>(
    reader: R,
    tz: Tz,
    today: NaiveDate,
) -> Result<Vec<WorkItem>> {
    let due_parser = DueDateParser::new(tz, today)?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut items = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 2; // 1-based, after the header

        let title = record.get(0).unwrap_or("").trim();
        if title.is_empty() {
            continue;
        }

        let due_raw = record.get(1).unwrap_or("").trim();
        let due_date = due_parser
            .parse(due_raw)
            .with_context(|| format!("assignments row {row} ({title})"))?;

        let hours_raw = record.get(2).unwrap_or("").trim();
        let estimated_hours: f64 = hours_raw
            .parse()
            .with_context(|| format!("assignments row {row} ({title}): bad hours '{hours_raw}'"))?;
        if estimated_hours < 0.0 {
            bail!("assignments row {row} ({title}): negative hours");
        }

        let priority = parse_priority(record.get(3).unwrap_or(""));

        items.push(WorkItem {
            title: title.to_string(),
            due_date,
            estimated_hours,
            priority,
        });
    }

    Ok(items)
}
