use serde::{Deserialize, Serialize};

/// The fixed 26-name enumeration from the glossary. Stored as a plain
/// string column rather than a database-level enum type so both dialects
/// share one schema, but the set is still closed in application code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenreName {
    Action,
    Adult,
    Adventure,
    Animation,
    Biography,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    FilmNoir,
    History,
    Horror,
    Music,
    Musical,
    Mystery,
    News,
    Romance,
    SciFi,
    Short,
    Sport,
    TalkShow,
    Thriller,
    War,
    Western,
}

impl GenreName {
    pub const ALL: [GenreName; 26] = [
        GenreName::Action,
        GenreName::Adult,
        GenreName::Adventure,
        GenreName::Animation,
        GenreName::Biography,
        GenreName::Comedy,
        GenreName::Crime,
        GenreName::Documentary,
        GenreName::Drama,
        GenreName::Family,
        GenreName::Fantasy,
        GenreName::FilmNoir,
        GenreName::History,
        GenreName::Horror,
        GenreName::Music,
        GenreName::Musical,
        GenreName::Mystery,
        GenreName::News,
        GenreName::Romance,
        GenreName::SciFi,
        GenreName::Short,
        GenreName::Sport,
        GenreName::TalkShow,
        GenreName::Thriller,
        GenreName::War,
        GenreName::Western,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenreName::Action => "Action",
            GenreName::Adult => "Adult",
            GenreName::Adventure => "Adventure",
            GenreName::Animation => "Animation",
            GenreName::Biography => "Biography",
            GenreName::Comedy => "Comedy",
            GenreName::Crime => "Crime",
            GenreName::Documentary => "Documentary",
            GenreName::Drama => "Drama",
            GenreName::Family => "Family",
            GenreName::Fantasy => "Fantasy",
            GenreName::FilmNoir => "Film-Noir",
            GenreName::History => "History",
            GenreName::Horror => "Horror",
            GenreName::Music => "Music",
            GenreName::Musical => "Musical",
            GenreName::Mystery => "Mystery",
            GenreName::News => "News",
            GenreName::Romance => "Romance",
            GenreName::SciFi => "Sci-Fi",
            GenreName::Short => "Short",
            GenreName::Sport => "Sport",
            GenreName::TalkShow => "Talk-Show",
            GenreName::Thriller => "Thriller",
            GenreName::War => "War",
            GenreName::Western => "Western",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

/// A row in the `genres` table. Distinct from `GenreName`: the latter is
/// the closed enumeration used to validate incoming names; this is the
/// persisted entity with its surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<i64>,
    pub name: String,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_genre_names_round_trip() {
        for genre in GenreName::ALL {
            assert_eq!(GenreName::parse(genre.as_str()), Some(genre));
        }
    }

    #[test]
    fn glossary_has_exactly_twenty_six_genres() {
        assert_eq!(GenreName::ALL.len(), 26);
    }
}
