//! Workload allocation.
//!
//! Spreads the estimated hours of each assignment over the days left before
//! its deadline, under a per-day cap, and summarizes how heavy the upcoming
//! stretch is. Pure calendar arithmetic: no model, no clock reads. The
//! caller supplies "today", which makes every result reproducible.
//!
//! Each item is allocated independently of the others. That costs some
//! realism (two items can both claim the same free afternoon) but buys
//! order independence: reordering the input never changes any item's
//! schedule.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::plan::TaskPriority;

/// Ignore sub-nanosecond dust from repeated f64 subtraction.
const HOURS_EPSILON: f64 = 1e-9;

/// Tunables for allocation and workload analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Hard ceiling of study hours scheduled on any single day.
    pub daily_cap_hours: f64,
    /// Items due within this many days are urgent even when the hours fit.
    pub urgent_threshold_days: i64,
    /// Look-ahead window for the workload analysis and the weekly schedule.
    pub analysis_window_days: i64,
    /// Hours inside the window at which the load stops being "low".
    pub medium_intensity_hours: f64,
    /// Hours inside the window above which the load is "high".
    pub high_intensity_hours: f64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            daily_cap_hours: 4.0,
            urgent_threshold_days: 2,
            analysis_window_days: 7,
            medium_intensity_hours: 10.0,
            high_intensity_hours: 25.0,
        }
    }
}

/// One assignment or exam to schedule study time for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub title: String,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    pub priority: TaskPriority,
}

/// Hours of an existing commitment (class, shift, practice) on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusySlot {
    pub date: NaiveDate,
    pub hours: f64,
}

/// One day's share of an item's study hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAllocation {
    /// Weekday label for display, e.g. "Monday".
    pub day: String,
    pub date: NaiveDate,
    pub hours: f64,
}

/// Study schedule for a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub title: String,
    pub due_date: NaiveDate,
    /// Whole days until the deadline. Zero or negative means due today or
    /// already past; such items still appear here, flagged urgent.
    pub days_remaining: i64,
    pub entries: Vec<DayAllocation>,
    /// Hours that found no day before the deadline. Anything positive means
    /// the item is infeasible under the current cap.
    pub unallocated_hours: f64,
}

impl Allocation {
    pub fn allocated_hours(&self) -> f64 {
        self.entries.iter().map(|entry| entry.hours).sum()
    }
}

/// Why an item made the urgent list, strictest condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyReason {
    /// Due today or already past.
    Overdue,
    /// The remaining days cannot absorb the estimated hours under the cap.
    InsufficientTime,
    /// Inside the urgency threshold, even though the hours still fit.
    DueSoon,
}

impl fmt::Display for UrgencyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UrgencyReason::Overdue => "due today or already past",
            UrgencyReason::InsufficientTime => "estimated hours do not fit before the deadline",
            UrgencyReason::DueSoon => "deadline inside the urgency window",
        };
        f.write_str(text)
    }
}

/// An item needing attention now, with the reason and the numbers behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentItem {
    pub title: String,
    pub due_date: NaiveDate,
    pub days_remaining: i64,
    /// Hours that do not fit before the deadline; 0 when they all fit.
    pub unallocated_hours: f64,
    pub reason: UrgencyReason,
}

/// How heavy the upcoming stretch is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

/// Aggregate view over all items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadAnalysis {
    pub total_items: usize,
    pub total_estimated_hours: f64,
    /// Items due inside the analysis window, overdue ones included.
    pub due_within_week: usize,
    pub hours_due_within_week: f64,
    pub intensity: Intensity,
}

/// Full allocator output: one allocation per input item (same order), the
/// aggregate analysis, and the urgent list sorted most-pressing first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadPlan {
    pub per_item: Vec<Allocation>,
    pub analysis: WorkloadAnalysis,
    pub urgent: Vec<UrgentItem>,
}

/// Allocate study hours for every item.
///
/// Per item: walk the days from `today` through the due date, skip days
/// whose committed hours already meet the cap, and place
/// `min(remaining, cap)` hours on each usable day until the estimate is
/// exhausted. Whatever is left after the due date is reported as
/// unallocated rather than silently squeezed in.
pub fn allocate(
    items: &[WorkItem],
    busy: &[BusySlot],
    today: NaiveDate,
    config: &AllocatorConfig,
) -> WorkloadPlan {
    let committed = committed_by_day(busy);

    let per_item: Vec<Allocation> = items
        .iter()
        .map(|item| allocate_item(item, &committed, today, config))
        .collect();

    let mut urgent: Vec<UrgentItem> = per_item
        .iter()
        .filter_map(|allocation| {
            classify_urgency(allocation, config).map(|reason| UrgentItem {
                title: allocation.title.clone(),
                due_date: allocation.due_date,
                days_remaining: allocation.days_remaining,
                unallocated_hours: allocation.unallocated_hours,
                reason,
            })
        })
        .collect();
    // Most pressing first; title breaks ties so the order is stable across
    // runs and input orderings.
    urgent.sort_by(|a, b| {
        a.days_remaining
            .cmp(&b.days_remaining)
            .then_with(|| a.title.cmp(&b.title))
    });

    let analysis = analyze(items, today, config);

    WorkloadPlan { per_item, analysis, urgent }
}

fn committed_by_day(busy: &[BusySlot]) -> HashMap<NaiveDate, f64> {
    let mut committed: HashMap<NaiveDate, f64> = HashMap::new();
    for slot in busy {
        *committed.entry(slot.date).or_insert(0.0) += slot.hours.max(0.0);
    }
    committed
}

fn allocate_item(
    item: &WorkItem,
    committed: &HashMap<NaiveDate, f64>,
    today: NaiveDate,
    config: &AllocatorConfig,
) -> Allocation {
    let days_remaining = (item.due_date - today).num_days();
    let mut remaining = item.estimated_hours.max(0.0);
    let mut entries = Vec::new();

    // The due date itself is usable: an item due tomorrow has two days of
    // runway, today and tomorrow.
    let mut cursor = today;
    while cursor <= item.due_date && remaining > HOURS_EPSILON {
        let busy_hours = committed.get(&cursor).copied().unwrap_or(0.0);
        if busy_hours < config.daily_cap_hours {
            let hours = remaining.min(config.daily_cap_hours);
            entries.push(DayAllocation {
                day: cursor.format("%A").to_string(),
                date: cursor,
                hours,
            });
            remaining -= hours;
        }
        cursor = cursor + Duration::days(1);
    }

    Allocation {
        title: item.title.clone(),
        due_date: item.due_date,
        days_remaining,
        entries,
        unallocated_hours: if remaining > HOURS_EPSILON { remaining } else { 0.0 },
    }
}

/// Strictest condition wins: overdue beats insufficient time beats due-soon.
fn classify_urgency(allocation: &Allocation, config: &AllocatorConfig) -> Option<UrgencyReason> {
    if allocation.days_remaining <= 0 {
        return Some(UrgencyReason::Overdue);
    }
    if allocation.unallocated_hours > HOURS_EPSILON {
        return Some(UrgencyReason::InsufficientTime);
    }
    if allocation.days_remaining <= config.urgent_threshold_days {
        return Some(UrgencyReason::DueSoon);
    }
    None
}

fn analyze(items: &[WorkItem], today: NaiveDate, config: &AllocatorConfig) -> WorkloadAnalysis {
    let mut due_within_week = 0usize;
    let mut hours_due_within_week = 0.0f64;
    let mut total_estimated_hours = 0.0f64;

    for item in items {
        let hours = item.estimated_hours.max(0.0);
        total_estimated_hours += hours;
        // Overdue work counts toward the window; it has to be absorbed in
        // the same days.
        if (item.due_date - today).num_days() <= config.analysis_window_days {
            due_within_week += 1;
            hours_due_within_week += hours;
        }
    }

    let intensity = if hours_due_within_week < config.medium_intensity_hours {
        Intensity::Low
    } else if hours_due_within_week <= config.high_intensity_hours {
        Intensity::Medium
    } else {
        Intensity::High
    };

    WorkloadAnalysis {
        total_items: items.len(),
        total_estimated_hours,
        due_within_week,
        hours_due_within_week,
        intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2026-03-02 is a Monday.
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn item(title: &str, due: NaiveDate, hours: f64) -> WorkItem {
        WorkItem {
            title: title.to_string(),
            due_date: due,
            estimated_hours: hours,
            priority: TaskPriority::Medium,
        }
    }

    #[test]
    fn test_spreads_hours_under_the_cap() {
        let today = monday();
        let items = vec![item("OS pset", today + Duration::days(2), 10.0)];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());

        let allocation = &plan.per_item[0];
        let hours: Vec<f64> = allocation.entries.iter().map(|e| e.hours).collect();
        assert_eq!(hours, vec![4.0, 4.0, 2.0]);
        assert_eq!(allocation.unallocated_hours, 0.0);
        assert_eq!(allocation.entries[0].day, "Monday");
        assert_eq!(allocation.entries[2].day, "Wednesday");
    }

    #[test]
    fn test_infeasible_item_reports_remainder() {
        // Ten hours, due tomorrow, cap four: at most eight can land.
        let today = monday();
        let items = vec![item("Econ essay", today + Duration::days(1), 10.0)];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());

        let allocation = &plan.per_item[0];
        assert_eq!(allocation.allocated_hours(), 8.0);
        assert!(allocation.entries.iter().all(|e| e.hours <= 4.0));
        assert_eq!(allocation.unallocated_hours, 2.0);

        assert_eq!(plan.urgent.len(), 1);
        assert_eq!(plan.urgent[0].reason, UrgencyReason::InsufficientTime);
        assert_eq!(plan.urgent[0].unallocated_hours, 2.0);
    }

    #[test]
    fn test_fully_committed_days_are_skipped() {
        let today = monday();
        let busy = vec![
            BusySlot { date: today, hours: 3.0 },
            BusySlot { date: today, hours: 2.0 }, // same day, sums to 5h
        ];
        let items = vec![item("Lab report", today + Duration::days(2), 6.0)];
        let plan = allocate(&items, &busy, today, &AllocatorConfig::default());

        let allocation = &plan.per_item[0];
        // Monday is over the 4h cap, so hours land Tuesday and Wednesday.
        assert_eq!(allocation.entries.len(), 2);
        assert_eq!(allocation.entries[0].date, today + Duration::days(1));
        assert_eq!(allocation.allocated_hours(), 6.0);
    }

    #[test]
    fn test_partially_busy_days_still_take_hours() {
        let today = monday();
        let busy = vec![BusySlot { date: today, hours: 3.0 }];
        let items = vec![item("Reading", today + Duration::days(1), 4.0)];
        let plan = allocate(&items, &busy, today, &AllocatorConfig::default());

        // 3h committed is under the 4h cap, so today is usable in full.
        assert_eq!(plan.per_item[0].entries[0].date, today);
        assert_eq!(plan.per_item[0].entries[0].hours, 4.0);
    }

    #[test]
    fn test_overdue_item_is_kept_and_flagged() {
        let today = monday();
        let items = vec![item("Late quiz", today - Duration::days(1), 2.0)];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());

        let allocation = &plan.per_item[0];
        assert_eq!(allocation.days_remaining, -1);
        assert!(allocation.entries.is_empty());
        assert_eq!(allocation.unallocated_hours, 2.0);
        assert_eq!(plan.urgent[0].reason, UrgencyReason::Overdue);
    }

    #[test]
    fn test_due_today_gets_one_day_and_overdue_flag() {
        let today = monday();
        let items = vec![item("Quiz tonight", today, 3.0)];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());

        let allocation = &plan.per_item[0];
        assert_eq!(allocation.days_remaining, 0);
        assert_eq!(allocation.allocated_hours(), 3.0);
        assert_eq!(plan.urgent[0].reason, UrgencyReason::Overdue);
    }

    #[test]
    fn test_due_soon_flag_when_hours_fit() {
        let today = monday();
        let items = vec![item("Short memo", today + Duration::days(2), 2.0)];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());

        assert_eq!(plan.per_item[0].unallocated_hours, 0.0);
        assert_eq!(plan.urgent.len(), 1);
        assert_eq!(plan.urgent[0].reason, UrgencyReason::DueSoon);
    }

    #[test]
    fn test_comfortable_item_is_not_urgent() {
        let today = monday();
        let items = vec![item("Term paper", today + Duration::days(20), 12.0)];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());
        assert!(plan.urgent.is_empty());
    }

    #[test]
    fn test_allocation_is_order_independent() {
        let today = monday();
        let items = vec![
            item("A", today + Duration::days(3), 9.0),
            item("B", today + Duration::days(1), 10.0),
            item("C", today + Duration::days(10), 5.0),
        ];
        let mut reversed = items.clone();
        reversed.reverse();

        let config = AllocatorConfig::default();
        let forward = allocate(&items, &[], today, &config);
        let backward = allocate(&reversed, &[], today, &config);

        for allocation in &forward.per_item {
            let twin = backward
                .per_item
                .iter()
                .find(|a| a.title == allocation.title)
                .unwrap();
            assert_eq!(twin, allocation);
        }
        assert_eq!(forward.urgent, backward.urgent);
        assert_eq!(forward.analysis, backward.analysis);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let today = monday();
        let items = vec![
            item("A", today + Duration::days(2), 7.5),
            item("B", today + Duration::days(5), 3.0),
        ];
        let busy = vec![BusySlot { date: today + Duration::days(1), hours: 6.0 }];
        let config = AllocatorConfig::default();

        assert_eq!(
            allocate(&items, &busy, today, &config),
            allocate(&items, &busy, today, &config)
        );
    }

    #[test]
    fn test_intensity_bands() {
        let today = monday();
        let config = AllocatorConfig::default();
        let due = today + Duration::days(3);

        let low = allocate(&[item("A", due, 9.9)], &[], today, &config);
        assert_eq!(low.analysis.intensity, Intensity::Low);

        let medium = allocate(&[item("A", due, 10.0)], &[], today, &config);
        assert_eq!(medium.analysis.intensity, Intensity::Medium);

        let still_medium = allocate(&[item("A", due, 25.0)], &[], today, &config);
        assert_eq!(still_medium.analysis.intensity, Intensity::Medium);

        let high = allocate(&[item("A", due, 25.5)], &[], today, &config);
        assert_eq!(high.analysis.intensity, Intensity::High);
    }

    #[test]
    fn test_analysis_window_counts_overdue_and_seventh_day() {
        let today = monday();
        let config = AllocatorConfig::default();
        let items = vec![
            item("Past", today - Duration::days(2), 1.0),
            item("Edge", today + Duration::days(7), 2.0),
            item("Beyond", today + Duration::days(8), 4.0),
        ];
        let plan = allocate(&items, &[], today, &config);

        assert_eq!(plan.analysis.due_within_week, 2);
        assert_eq!(plan.analysis.hours_due_within_week, 3.0);
        assert_eq!(plan.analysis.total_items, 3);
        assert_eq!(plan.analysis.total_estimated_hours, 7.0);
    }

    #[test]
    fn test_no_items_is_a_quiet_week() {
        let plan = allocate(&[], &[], monday(), &AllocatorConfig::default());
        assert!(plan.per_item.is_empty());
        assert!(plan.urgent.is_empty());
        assert_eq!(plan.analysis.total_items, 0);
        assert_eq!(plan.analysis.intensity, Intensity::Low);
    }

    #[test]
    fn test_urgent_list_sorted_most_pressing_first() {
        let today = monday();
        let items = vec![
            item("Soon", today + Duration::days(2), 1.0),
            item("Past", today - Duration::days(3), 2.0),
            item("Tight", today + Duration::days(1), 9.0),
        ];
        let plan = allocate(&items, &[], today, &AllocatorConfig::default());

        let titles: Vec<&str> = plan.urgent.iter().map(|u| u.title.as_str()).collect();
        assert_eq!(titles, vec!["Past", "Tight", "Soon"]);
    }

    #[test]
    fn test_urgency_reason_wire_names() {
        let json = serde_json::to_string(&UrgencyReason::InsufficientTime).unwrap();
        assert_eq!(json, "\"insufficient-time\"");
        assert_eq!(serde_json::to_string(&UrgencyReason::DueSoon).unwrap(), "\"due-soon\"");
    }
}
