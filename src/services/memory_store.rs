use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::errors::storage::{StorageError, StorageResult};
use crate::models::{Project, Task, TaskFilter, User};
use crate::services::Store;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

impl Tables {
    fn has_project(&self, id: Uuid) -> bool {
        self.projects.iter().any(|p| p.id == id)
    }
}

/// Process-local store used for development and tests. Every operation runs
/// under one lock, which gives it the same all-or-nothing behaviour as the
/// Redis transactions.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict(format!("email {} already registered", user.email)));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn count_users(&self) -> StorageResult<usize> {
        Ok(self.tables.read().await.users.len())
    }

    async fn insert_project(&self, project: &Project) -> StorageResult<()> {
        self.tables.write().await.projects.push(project.clone());
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> StorageResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        Ok(self.tables.read().await.projects.clone())
    }

    async fn delete_project(&self, id: Uuid) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Ok(false);
        }
        tables.tasks.retain(|t| t.project_id != id);
        Ok(true)
    }

    async fn insert_task(&self, task: &Task) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.has_project(task.project_id) {
            return Err(StorageError::MissingProject(task.project_id));
        }
        tables.tasks.push(task.clone());
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> StorageResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update_task(&self, task: &Task) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.has_project(task.project_id) {
            return Err(StorageError::MissingProject(task.project_id));
        }
        match tables.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: Uuid) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        Ok(tables.tasks.len() != before)
    }

    async fn query_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
    }
}
