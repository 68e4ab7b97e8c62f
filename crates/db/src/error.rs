use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("connection pool exhausted after {0} attempts")]
    PoolExhausted(u32),

    #[error("row decode error: {0}")]
    Decode(String),

    #[error("unsupported value for column '{column}': {reason}")]
    UnsupportedValue { column: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DbError>;
