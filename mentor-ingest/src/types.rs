//! Bundled allocator inputs.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;

use mentor_core::{BusySlot, WorkItem};

use crate::parsers::{assignments, timetable};

/// Everything one scheduling run needs, loaded together.
#[derive(Debug, Clone, Default)]
pub struct ScheduleInputs {
    pub items: Vec<WorkItem>,
    pub busy: Vec<BusySlot>,
}

impl ScheduleInputs {
    /// Load the assignments export and, when given, the timetable export.
    pub fn load(
        assignments_path: impl AsRef<Path>,
        timetable_path: Option<&Path>,
        tz: Tz,
        today: NaiveDate,
    ) -> Result<Self> {
        let items = assignments::parse_assignments_csv(assignments_path, tz, today)?;
        let busy = match timetable_path {
            Some(path) => timetable::parse_timetable_csv(path)?,
            None => Vec::new(),
        };
        Ok(Self { items, busy })
    }
}
