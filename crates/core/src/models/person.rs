use serde::{Deserialize, Serialize};

macro_rules! person_entity {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub id: Option<i64>,
            pub name: String,
        }

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    id: None,
                    name: name.into(),
                }
            }
        }
    };
}

// Directors, writers and actors share an identical shape but are kept as
// distinct Rust types deliberately: a person credited as both a director
// and an actor on the same film gets two unrelated rows, one per role
// table, never a shared id.
person_entity!(Director, "A row in the `directors` table.");
person_entity!(Writer, "A row in the `writers` table.");
person_entity!(Actor, "A row in the `actors` table.");
