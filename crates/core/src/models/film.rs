use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row in the `films` table, plus the related-entity names carried
/// alongside it between deserialization and persistence. The related
/// names are not columns on `films` — they drive the upsert-into-role-
/// table-then-join-row steps in Phase B, per the film/plot/related/join
/// ordering. There is no `year` column here: a film's year lives on the
/// article it resolved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: Option<i64>,
    pub article_id: i64,
    pub plot_id: Option<i64>,
    pub imdb_id: i64,
    pub film_type: Option<String>,
    pub title: String,
    pub countries: Option<String>,
    pub languages: Option<String>,
    pub duration_seconds: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub content_rating: Option<String>,
    pub imdb_rating: Option<f64>,
    pub poster_url: Option<String>,

    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
}

impl Film {
    /// A film is only ever invalid if it lacks the one field the system
    /// cannot function without: its IMDb id, which must be a positive
    /// integer (I2). Everything else — missing plot, missing rating,
    /// missing related names — is a legal, partially-populated row (I1).
    pub fn validate(&self) -> Result<(), String> {
        if self.imdb_id <= 0 {
            return Err("film is missing a positive imdb_id".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_film() -> Film {
        Film {
            id: None,
            article_id: 1,
            plot_id: None,
            imdb_id: 111161,
            film_type: Some("movie".to_string()),
            title: "The Shawshank Redemption".to_string(),
            countries: None,
            languages: None,
            duration_seconds: None,
            release_date: None,
            content_rating: None,
            imdb_rating: None,
            poster_url: None,
            genres: vec![],
            directors: vec![],
            writers: vec![],
            actors: vec![],
        }
    }

    #[test]
    fn film_missing_plot_and_rating_is_still_valid() {
        assert!(base_film().validate().is_ok());
    }

    #[test]
    fn film_without_imdb_id_is_invalid() {
        let mut film = base_film();
        film.imdb_id = 0;
        assert!(film.validate().is_err());
    }
}
