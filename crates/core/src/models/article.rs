use serde::{Deserialize, Serialize};

/// A Wikipedia article title discovered by Phase A, not yet resolved to
/// a film. `year` is the category year it was discovered under, not
/// necessarily the film's release year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Option<i64>,
    pub title: String,
    pub year: i32,
}

impl Article {
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            id: None,
            title: title.into(),
            year,
        }
    }
}
