use serde::{Deserialize, Serialize};

/// A row in the `plots` table. Both fields are independently nullable —
/// a film can have an OMDb plot with no Wikipedia plot-section match, or
/// vice versa, but never neither (a plot row is only created once at
/// least one source produced content).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    pub id: Option<i64>,
    pub imdb_content: Option<String>,
    pub wikipedia_content: Option<String>,
}

impl Plot {
    pub fn new(imdb_content: Option<String>, wikipedia_content: Option<String>) -> Self {
        Self {
            id: None,
            imdb_content,
            wikipedia_content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imdb_content.is_none() && self.wikipedia_content.is_none()
    }
}
