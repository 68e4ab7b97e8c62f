pub mod aggregate;
pub mod delete;
pub mod dialect;
pub mod group_wise;
pub mod insert;
pub mod query;
pub mod select;

pub use aggregate::generate_aggregate;
pub use delete::generate_delete;
pub use dialect::Dialect;
pub use group_wise::generate_group_wise;
pub use insert::generate_insert;
pub use query::Query;
pub use select::generate_select;
