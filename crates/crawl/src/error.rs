use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Db(#[from] cinegraph_db::DbError),

    #[error(transparent)]
    Http(#[from] cinegraph_http::HttpError),

    #[error("{0}")]
    Core(String),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
