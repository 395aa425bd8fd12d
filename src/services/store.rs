use async_trait::async_trait;
use uuid::Uuid;
use crate::errors::storage::StorageResult;
use crate::models::{Project, Task, TaskFilter, User};

/// Record-level access to users, projects and tasks.
///
/// Each call is a single atomic operation; callers never coordinate multiple
/// calls with locks of their own. Listing calls return records in insertion
/// order.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StorageResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Fails with `StorageError::Conflict` when the email is already taken.
    async fn insert_user(&self, user: &User) -> StorageResult<()>;

    async fn count_users(&self) -> StorageResult<usize>;

    async fn insert_project(&self, project: &Project) -> StorageResult<()>;

    async fn find_project(&self, id: Uuid) -> StorageResult<Option<Project>>;

    async fn list_projects(&self) -> StorageResult<Vec<Project>>;

    /// Deletes the project and every task that references it.
    /// Returns `false` when no such project exists.
    async fn delete_project(&self, id: Uuid) -> StorageResult<bool>;

    /// Fails with `StorageError::MissingProject` when the task's project does
    /// not exist at the time of the write.
    async fn insert_task(&self, task: &Task) -> StorageResult<()>;

    async fn find_task(&self, id: Uuid) -> StorageResult<Option<Task>>;

    /// Replaces the stored task with the same id. Returns `false` when it does not exist
    /// and `StorageError::MissingProject` when the new project does not.
    async fn update_task(&self, task: &Task) -> StorageResult<bool>;

    async fn delete_task(&self, id: Uuid) -> StorageResult<bool>;

    async fn query_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>>;
}
