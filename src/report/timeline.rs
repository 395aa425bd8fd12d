use chrono::NaiveDateTime;
use serde::Serialize;
use crate::errors::{AppError, FieldViolation};

/// Raw input for one timeline row: a task joined with its project name.
#[derive(Debug, Clone)]
pub struct LabeledInterval {
    pub activity: String,
    pub project_name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Build a user's timeline, ordered by start time.
///
/// The whole call fails if any interval has `end <= start`; every offending
/// index is reported. Sorting is stable, so rows sharing a start time keep
/// their input order.
pub fn build_timeline(intervals: &[LabeledInterval]) -> Result<Vec<TimelineEntry>, AppError> {
    let violations: Vec<FieldViolation> = intervals
        .iter()
        .enumerate()
        .filter(|(_, interval)| interval.end <= interval.start)
        .map(|(index, _)| {
            FieldViolation::new(format!("intervals[{}]", index), "end must be later than start")
        })
        .collect();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let mut entries: Vec<TimelineEntry> = intervals
        .iter()
        .map(|interval| TimelineEntry {
            label: format!("{} - {}", interval.activity, interval.project_name),
            start: interval.start,
            end: interval.end,
        })
        .collect();
    entries.sort_by_key(|entry| entry.start);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn labeled(activity: &str, start: u32, end: u32) -> LabeledInterval {
        LabeledInterval {
            activity: activity.to_string(),
            project_name: "Alpha".to_string(),
            start: at(start),
            end: at(end),
        }
    }

    #[test]
    fn test_sorted_by_start() {
        let entries = build_timeline(&[labeled("late", 14, 15), labeled("early", 8, 9)]).unwrap();
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["early - Alpha", "late - Alpha"]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let input = [
            labeled("third", 11, 12),
            labeled("first", 9, 10),
            labeled("second", 9, 11),
            labeled("fourth", 9, 12),
        ];

        let labels: Vec<_> = build_timeline(&input)
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(
            labels,
            ["first - Alpha", "second - Alpha", "fourth - Alpha", "third - Alpha"]
        );

        // Same input, same output.
        assert_eq!(build_timeline(&input).unwrap(), build_timeline(&input).unwrap());
    }

    #[test]
    fn test_invalid_interval_rejects_whole_call() {
        let input = [labeled("ok", 9, 10), labeled("empty", 10, 10), labeled("reversed", 12, 11)];

        match build_timeline(&input) {
            Err(AppError::Validation(violations)) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, ["intervals[1]", "intervals[2]"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_empty_timeline() {
        assert!(build_timeline(&[]).unwrap().is_empty());
    }
}
