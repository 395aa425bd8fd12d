use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};
use crate::models::timestamp;

/// A tracked activity as stored by the persistence gateway.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub activity: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Request body for creating or replacing a task.
///
/// `PATCH` uses this same body: updates always replace every field.
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "end_after_start"))]
pub struct TaskInput {
    pub project: Uuid,
    pub user: Uuid,
    pub activity: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub datetime_start: NaiveDateTime,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub datetime_end: NaiveDateTime,
}

// Schema-level errors carry a `field` param naming the offending input field.
fn end_after_start(input: &TaskInput) -> Result<(), ValidationError> {
    if input.datetime_end <= input.datetime_start {
        let mut error = ValidationError::new("interval");
        error.message = Some("datetimeEnd must be later than datetimeStart".into());
        error.add_param("field".into(), &"datetimeEnd");
        return Err(error);
    }
    Ok(())
}

impl TaskInput {
    pub fn into_task(self, id: Uuid) -> Task {
        Task {
            id,
            project_id: self.project,
            user_id: self.user,
            activity: self.activity,
            start_time: self.datetime_start,
            end_time: self.datetime_end,
        }
    }
}

/// Response shape for a task, using the field names clients send.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskOut {
    pub id: Uuid,
    pub project: Uuid,
    pub user: Uuid,
    pub activity: String,
    pub datetime_start: NaiveDateTime,
    pub datetime_end: NaiveDateTime,
}

impl From<Task> for TaskOut {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project: task.project_id,
            user: task.user_id,
            activity: task.activity,
            datetime_start: task.start_time,
            datetime_end: task.end_time,
        }
    }
}

/// Predicate for `Store::query_tasks`; `None` fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub user_id: Option<Uuid>,
    pub start_from: Option<NaiveDateTime>,
    pub end_until: Option<NaiveDateTime>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.user_id.map_or(true, |user| task.user_id == user)
            && self.start_from.map_or(true, |from| task.start_time >= from)
            && self.end_until.map_or(true, |until| task.end_time <= until)
    }
}
