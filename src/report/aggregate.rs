use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;
use crate::errors::{AppError, FieldViolation};
use crate::models::Task;

/// A validated time interval belonging to a project and a user.
///
/// `end > start` always holds; equal times are rejected rather than treated
/// as a zero-length interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskInterval {
    project_id: Uuid,
    user_id: Uuid,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TaskInterval {
    pub fn new(
        project_id: Uuid,
        user_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, FieldViolation> {
        if end <= start {
            return Err(FieldViolation::new("end", "end must be later than start"));
        }
        Ok(Self {
            project_id,
            user_id,
            start,
            end,
        })
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Length in seconds, keeping sub-second precision.
    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.start, self.end)
    }
}

impl TryFrom<&Task> for TaskInterval {
    type Error = FieldViolation;

    fn try_from(task: &Task) -> Result<Self, Self::Error> {
        TaskInterval::new(task.project_id, task.user_id, task.start_time, task.end_time)
    }
}

pub(crate) fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let span = end - start;
    match span.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => span.num_milliseconds() as f64 / 1e3,
    }
}

/// Inclusive query window; `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ReportWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::invalid("datetimeEnd", "end must be >= start"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Both ends of the interval inside the window. Partial overlaps do not count.
    pub fn contains(&self, interval: &TaskInterval) -> bool {
        interval.start >= self.start && interval.end <= self.end
    }
}

/// One row of the aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTotal {
    pub project: Uuid,
    pub total: f64, // seconds
}

/// Sum the durations of the intervals contained in `window`, per project.
///
/// Projects without a contained interval are absent from the result. The map
/// is keyed by project id, so iteration order is deterministic.
pub fn summarize_by_project(
    intervals: &[TaskInterval],
    window: &ReportWindow,
) -> BTreeMap<Uuid, f64> {
    let mut totals = BTreeMap::new();
    for interval in intervals.iter().filter(|i| window.contains(i)) {
        *totals.entry(interval.project_id).or_insert(0.0) += interval.duration_seconds();
    }
    totals
}

pub fn project_totals(totals: BTreeMap<Uuid, f64>) -> Vec<ProjectTotal> {
    totals
        .into_iter()
        .map(|(project, total)| ProjectTotal { project, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rstest::rstest;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn interval(project: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> TaskInterval {
        TaskInterval::new(project, Uuid::nil(), start, end).unwrap()
    }

    fn window(start: NaiveDateTime, end: NaiveDateTime) -> ReportWindow {
        ReportWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_interval_rejects_empty_and_reversed() {
        let p = Uuid::new_v4();
        assert!(TaskInterval::new(p, p, at(10, 0), at(10, 0)).is_err());
        assert!(TaskInterval::new(p, p, at(11, 0), at(10, 0)).is_err());
        assert!(TaskInterval::new(p, p, at(10, 0), at(10, 1)).is_ok());
    }

    #[test]
    fn test_window_rejects_end_before_start() {
        assert!(ReportWindow::new(at(10, 0), at(10, 0)).is_ok());
        assert!(matches!(
            ReportWindow::new(at(12, 0), at(10, 0)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        let totals = summarize_by_project(&[], &window(at(0, 0), at(23, 0)));
        assert!(totals.is_empty());
    }

    #[test]
    fn test_sums_contained_intervals_per_project() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let intervals = [
            interval(p1, at(10, 0), at(11, 0)),
            interval(p1, at(11, 0), at(12, 0)),
            interval(p2, at(9, 0), at(9, 30)),
        ];

        let totals = summarize_by_project(&intervals, &window(at(10, 0), at(12, 0)));

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&p1], 7200.0);
        assert!(!totals.contains_key(&p2));
    }

    #[rstest]
    #[case::spans_both_edges(at(9, 0), at(13, 0))]
    #[case::overlaps_start(at(9, 30), at(10, 30))]
    #[case::overlaps_end(at(11, 30), at(12, 30))]
    #[case::entirely_before(at(8, 0), at(9, 0))]
    fn test_partial_overlap_is_excluded(#[case] start: NaiveDateTime, #[case] end: NaiveDateTime) {
        let p = Uuid::new_v4();
        let intervals = [interval(p, start, end)];
        let totals = summarize_by_project(&intervals, &window(at(10, 0), at(12, 0)));
        assert!(totals.is_empty());
    }

    #[test]
    fn test_interval_equal_to_window_is_included() {
        let p = Uuid::new_v4();
        let intervals = [interval(p, at(10, 0), at(12, 0))];
        let totals = summarize_by_project(&intervals, &window(at(10, 0), at(12, 0)));
        assert_eq!(totals[&p], 7200.0);
    }

    #[test]
    fn test_fractional_seconds_are_preserved() {
        let p = Uuid::new_v4();
        let start = at(10, 0);
        let end = start + Duration::milliseconds(1500);
        let intervals = [interval(p, start, end)];
        let totals = summarize_by_project(&intervals, &window(at(10, 0), at(11, 0)));
        assert_eq!(totals[&p], 1.5);
    }

    #[test]
    fn test_project_totals_are_ordered_by_project() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        let intervals = [
            interval(high, at(10, 0), at(10, 30)),
            interval(low, at(10, 30), at(11, 0)),
        ];

        let rows = project_totals(summarize_by_project(&intervals, &window(at(10, 0), at(12, 0))));
        assert_eq!(
            rows,
            vec![
                ProjectTotal { project: low, total: 1800.0 },
                ProjectTotal { project: high, total: 1800.0 },
            ]
        );
    }
}
