//! SVG Gantt chart of a user's timeline.
use chrono::NaiveDateTime;
use plotters::prelude::*;
use crate::errors::AppError;
use crate::report::aggregate::seconds_between;
use crate::report::TimelineEntry;

const WIDTH: u32 = 1200;
const ROW_HEIGHT: u32 = 40;
const CHROME_HEIGHT: u32 = 140;

fn render_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Internal(format!("failed to render chart: {}", e))
}

fn hours_since(origin: NaiveDateTime, at: NaiveDateTime) -> f64 {
    seconds_between(origin, at) / 3600.0
}

/// Render `entries` as horizontal bars, one row per entry, on an axis of
/// hours since the earliest start.
pub fn render_gantt(title: &str, entries: &[TimelineEntry]) -> Result<String, AppError> {
    let origin = entries
        .iter()
        .map(|e| e.start)
        .min()
        .ok_or_else(|| AppError::Internal("cannot render an empty timeline".into()))?;
    let span = entries
        .iter()
        .map(|e| hours_since(origin, e.end))
        .fold(1.0_f64, f64::max);

    let rows = entries.len();
    let height = CHROME_HEIGHT + ROW_HEIGHT * rows as u32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(20)
            .build_cartesian_2d(0f64..span, 0f64..rows as f64)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_desc("Timeline (hours)")
            .y_desc("Tasks")
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(entries.iter().enumerate().map(|(row, entry)| {
                let y = (rows - 1 - row) as f64;
                Rectangle::new(
                    [
                        (hours_since(origin, entry.start), y + 0.3),
                        (hours_since(origin, entry.end), y + 0.7),
                    ],
                    Palette99::pick(row).filled(),
                )
            }))
            .map_err(render_error)?;

        chart
            .draw_series(entries.iter().enumerate().map(|(row, entry)| {
                let y = (rows - 1 - row) as f64;
                Text::new(
                    entry.label.clone(),
                    (hours_since(origin, entry.start), y + 0.95),
                    ("sans-serif", 14).into_font(),
                )
            }))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_render_contains_labels() {
        let entries = vec![
            TimelineEntry { label: "Design - Alpha".into(), start: at(9), end: at(11) },
            TimelineEntry { label: "Review - Beta".into(), start: at(13), end: at(14) },
        ];

        let svg = render_gantt("Gantt chart for admin@example.com", &entries).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Design - Alpha"));
        assert!(svg.contains("Review - Beta"));
    }

    #[test]
    fn test_render_rejects_empty_timeline() {
        assert!(matches!(render_gantt("empty", &[]), Err(AppError::Internal(_))));
    }
}
