use async_trait::async_trait;
use redis::{aio::Connection, AsyncCommands, Client, Script};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use crate::errors::storage::{StorageError, StorageResult};
use crate::models::{Project, Task, TaskFilter, User};
use crate::services::Store;

const USERS: &str = "users";
const PROJECTS: &str = "projects";
const TASKS: &str = "tasks";

fn user_key(id: Uuid) -> String {
    format!("user:{}", id)
}

fn email_key(email: &str) -> String {
    format!("user_email:{}", email)
}

fn project_key(id: Uuid) -> String {
    format!("project:{}", id)
}

fn project_tasks_key(id: Uuid) -> String {
    format!("project_tasks:{}", id)
}

fn task_key(id: Uuid) -> String {
    format!("task:{}", id)
}

// KEYS: project, task, tasks list, project_tasks list. ARGV: task json, task id.
const INSERT_TASK: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then return 0 end
redis.call('SET', KEYS[2], ARGV[1])
redis.call('RPUSH', KEYS[3], ARGV[2])
redis.call('RPUSH', KEYS[4], ARGV[2])
return 1
"#;

// KEYS: task, new project, new project_tasks list. ARGV: task json, task id, new project id.
// Returns 0 for a missing task and -1 for a missing project.
const UPDATE_TASK: &str = r#"
local stored = redis.call('GET', KEYS[1])
if not stored then return 0 end
if redis.call('EXISTS', KEYS[2]) == 0 then return -1 end
local previous = cjson.decode(stored)['project_id']
redis.call('SET', KEYS[1], ARGV[1])
if previous ~= ARGV[3] then
    redis.call('LREM', 'project_tasks:' .. previous, 0, ARGV[2])
    redis.call('RPUSH', KEYS[3], ARGV[2])
end
return 1
"#;

// KEYS: task, tasks list. ARGV: task id.
const DELETE_TASK: &str = r#"
local stored = redis.call('GET', KEYS[1])
if not stored then return 0 end
local project = cjson.decode(stored)['project_id']
redis.call('DEL', KEYS[1])
redis.call('LREM', KEYS[2], 0, ARGV[1])
redis.call('LREM', 'project_tasks:' .. project, 0, ARGV[1])
return 1
"#;

// KEYS: project, projects list, project_tasks list, tasks list. ARGV: project id.
// Returns -1 when the project does not exist, otherwise the number of tasks removed.
const DELETE_PROJECT: &str = r#"
if redis.call('DEL', KEYS[1]) == 0 then return -1 end
redis.call('LREM', KEYS[2], 0, ARGV[1])
local ids = redis.call('LRANGE', KEYS[3], 0, -1)
for _, id in ipairs(ids) do
    redis.call('DEL', 'task:' .. id)
    redis.call('LREM', KEYS[4], 0, id)
end
redis.call('DEL', KEYS[3])
return #ids
"#;

/// Redis-backed store. Records are JSON strings; the `users`, `projects` and
/// `tasks` lists keep insertion order. Multi-key writes run in a MULTI/EXEC
/// pipeline, or in a Lua script when they depend on a read.
#[derive(Clone)]
pub struct RedisStore {
    client: Arc<Client>,
}

impl RedisStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn open(url: &str) -> StorageResult<Self> {
        Ok(Self::new(Arc::new(Client::open(url)?)))
    }

    async fn connection(&self) -> StorageResult<Connection> {
        Ok(self.client.get_async_connection().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        conn: &mut Connection,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let data: Option<String> = conn.get(key).await?;
        data.map(|data| serde_json::from_str(&data))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Loads every record named in `ids`, skipping ids whose record is gone.
    async fn get_many<T: DeserializeOwned>(
        conn: &mut Connection,
        ids: &[String],
        key: fn(&str) -> String,
    ) -> StorageResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = ids.iter().map(|id| key(id)).collect();
        let values: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(conn).await?;

        values
            .into_iter()
            .flatten()
            .map(|data| serde_json::from_str(&data).map_err(StorageError::from))
            .collect()
    }

    fn to_json<T: Serialize>(value: &T) -> StorageResult<String> {
        Ok(serde_json::to_string(value)?)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn find_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        let mut conn = self.connection().await?;
        Self::get_json(&mut conn, &user_key(id)).await
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let mut conn = self.connection().await?;
        let id: Option<String> = conn.get(email_key(email)).await?;
        match id {
            Some(id) => Self::get_json(&mut conn, &format!("user:{}", id)).await,
            None => Ok(None),
        }
    }

    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        let mut conn = self.connection().await?;
        let email = email_key(&user.email);

        // The email index doubles as the uniqueness constraint.
        let claimed: bool = conn.set_nx(&email, user.id.to_string()).await?;
        if !claimed {
            return Err(StorageError::Conflict(format!("email {} already registered", user.email)));
        }

        let written = redis::pipe()
            .atomic()
            .set(user_key(user.id), Self::to_json(user)?)
            .ignore()
            .rpush(USERS, user.id.to_string())
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await;

        if let Err(e) = written {
            tracing::error!("Failed to save user {}, releasing email claim: {}", user.id, e);
            if let Err(release) = conn.del::<_, ()>(&email).await {
                tracing::warn!("Email claim {} not released and stays taken: {}", email, release);
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn count_users(&self) -> StorageResult<usize> {
        let mut conn = self.connection().await?;
        Ok(conn.llen(USERS).await?)
    }

    async fn insert_project(&self, project: &Project) -> StorageResult<()> {
        let mut conn = self.connection().await?;
        redis::pipe()
            .atomic()
            .set(project_key(project.id), Self::to_json(project)?)
            .ignore()
            .rpush(PROJECTS, project.id.to_string())
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> StorageResult<Option<Project>> {
        let mut conn = self.connection().await?;
        Self::get_json(&mut conn, &project_key(id)).await
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn.lrange(PROJECTS, 0, -1).await?;
        Self::get_many(&mut conn, &ids, |id| format!("project:{}", id)).await
    }

    async fn delete_project(&self, id: Uuid) -> StorageResult<bool> {
        let mut conn = self.connection().await?;
        let removed: i64 = Script::new(DELETE_PROJECT)
            .key(project_key(id))
            .key(PROJECTS)
            .key(project_tasks_key(id))
            .key(TASKS)
            .arg(id.to_string())
            .invoke_async(&mut conn)
            .await?;

        if removed < 0 {
            return Ok(false);
        }
        tracing::debug!("Deleted project {} with {} tasks", id, removed);
        Ok(true)
    }

    async fn insert_task(&self, task: &Task) -> StorageResult<()> {
        let mut conn = self.connection().await?;
        let inserted: i64 = Script::new(INSERT_TASK)
            .key(project_key(task.project_id))
            .key(task_key(task.id))
            .key(TASKS)
            .key(project_tasks_key(task.project_id))
            .arg(Self::to_json(task)?)
            .arg(task.id.to_string())
            .invoke_async(&mut conn)
            .await?;

        if inserted == 0 {
            return Err(StorageError::MissingProject(task.project_id));
        }
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> StorageResult<Option<Task>> {
        let mut conn = self.connection().await?;
        Self::get_json(&mut conn, &task_key(id)).await
    }

    async fn update_task(&self, task: &Task) -> StorageResult<bool> {
        let mut conn = self.connection().await?;
        let outcome: i64 = Script::new(UPDATE_TASK)
            .key(task_key(task.id))
            .key(project_key(task.project_id))
            .key(project_tasks_key(task.project_id))
            .arg(Self::to_json(task)?)
            .arg(task.id.to_string())
            .arg(task.project_id.to_string())
            .invoke_async(&mut conn)
            .await?;

        match outcome {
            -1 => Err(StorageError::MissingProject(task.project_id)),
            0 => Ok(false),
            _ => Ok(true),
        }
    }

    async fn delete_task(&self, id: Uuid) -> StorageResult<bool> {
        let mut conn = self.connection().await?;
        let deleted: i64 = Script::new(DELETE_TASK)
            .key(task_key(id))
            .key(TASKS)
            .arg(id.to_string())
            .invoke_async(&mut conn)
            .await?;
        Ok(deleted == 1)
    }

    async fn query_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn.lrange(TASKS, 0, -1).await?;
        let tasks: Vec<Task> = Self::get_many(&mut conn, &ids, |id| format!("task:{}", id)).await?;
        Ok(tasks.into_iter().filter(|t| filter.matches(t)).collect())
    }
}
