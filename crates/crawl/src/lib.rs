pub mod articles;
pub mod deserialize;
pub mod error;
pub mod films;
pub mod orchestrator;

pub use error::{CrawlError, Result};
