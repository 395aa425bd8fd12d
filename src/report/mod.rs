//! Interval aggregation and per-user timelines.

pub mod aggregate;
pub mod gantt;
pub mod timeline;

pub use aggregate::{project_totals, summarize_by_project, ProjectTotal, ReportWindow, TaskInterval};
pub use gantt::render_gantt;
pub use timeline::{build_timeline, LabeledInterval, TimelineEntry};
