use error_common::{Code, Fault};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("mapping not found")]
    NotFound,

    #[error("mapping already exists")]
    AlreadyExists,

    #[error("mapping expired")]
    Expired,

    #[error("token ttl must be greater than zero")]
    InvalidTtl,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("cache payload error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Fault for MappingError {
    fn code(&self) -> Code {
        match self {
            MappingError::NotFound => Code::NotFound,
            MappingError::AlreadyExists => Code::AlreadyExists,
            MappingError::Expired => Code::DeadlineExceeded,
            MappingError::InvalidTtl => Code::InvalidArgument,
            MappingError::Database(_)
            | MappingError::Cache(_)
            | MappingError::Serialization(_) => Code::Internal,
        }
    }
}

pub type MappingResult<T> = Result<T, MappingError>;
