pub mod error;
pub mod models;
pub mod retry;
pub mod table;
pub mod value;

pub use error::{CoreError, Result};
pub use value::{Comparator, Direction, Filter, Ordering, Record, Value, MYSQL_MAX_BIGINT_VALUE};
