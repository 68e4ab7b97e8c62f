use cinegraph_core::Value;

/// A generated statement paired with its positional parameters, in bind
/// order. Nothing in this crate touches a database connection; `Query`
/// is handed to cinegraph-db for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Query {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}
