mod user;
mod forms;
mod project;
mod task;
pub mod timestamp;

pub use user::{User, UserCreate, UserIdentity, UserOut};
pub use forms::{LoginForm, ReportQuery, TaskQuery, TokenResponse};
pub use project::{Project, ProjectCreate};
pub use task::{Task, TaskFilter, TaskInput, TaskOut};
