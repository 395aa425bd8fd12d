mod auth;
mod projects;
mod reports;
mod tasks;
mod users;

pub use auth::handle_login;
pub use projects::{create_project, delete_project, get_project, list_projects};
pub use reports::{get_gantt, get_report, get_timeline};
pub use tasks::{create_task, delete_task, get_task, list_tasks, replace_task};
pub use users::{create_user, get_user};
