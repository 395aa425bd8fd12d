use redis::RedisError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Project {0} does not exist")]
    MissingProject(Uuid),
}

pub type StorageResult<T> = Result<T, StorageError>;
