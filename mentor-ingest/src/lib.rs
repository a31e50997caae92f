//! mentor-ingest: turns campus portal exports (CSV) into allocator inputs.

pub mod parsers;
pub mod types;

pub use parsers::assignments::{parse_assignments_csv, parse_due_date};
pub use parsers::timetable::parse_timetable_csv;
pub use types::ScheduleInputs;
