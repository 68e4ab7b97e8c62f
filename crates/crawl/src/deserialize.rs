use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use cinegraph_core::models::{Film, Plot};

const NOT_AVAILABLE_VALUE_ALIAS: &str = "N/A";
const RELEASE_DATE_FORMAT: &str = "%d %b %Y";

/// `(?<=^tt)\d+$` in the original, rewritten without lookbehind: anchor on
/// the literal `tt` prefix and capture the digits after it. Used to
/// validate/parse OMDb's `imdbID` field — unlike the wikitext-scanning
/// regex in cinegraph-http, this one is anchored so `"0000001"` (no `tt`
/// prefix) is correctly refused rather than matched.
static OMDB_IMDB_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^tt(\d+)$").unwrap());

/// `^(\d+ h\s*)?((\d+)(?= min$))?` in the original, rewritten without
/// lookahead as two independent capture groups anchored to the whole
/// string. Handles "2h 22min", "142 min", and "2 h" alone.
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+) h\s*)?(?:(\d+) min)?$").unwrap());

static UNRATED_CONTENT_RATINGS: Lazy<[&'static str; 2]> = Lazy::new(|| ["NOT RATED", "UNRATED"]);

/// OMDb's "N/A" sentinel normalizes to a real null everywhere it shows
/// up, not just on fields with their own dedicated parser.
fn normalize_na(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE_VALUE_ALIAS) {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_content_rating(value: &str) -> Option<String> {
    let value = normalize_na(value)?;
    if UNRATED_CONTENT_RATINGS.contains(&value.to_uppercase().as_str()) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parses and validates an OMDb `imdbID`, stripping any leading zeros
/// after the `tt` prefix and returning the canonical positive integer
/// form the `films.imdb_id` column stores (re-padded to 7 digits only
/// when cinegraph-http builds the outgoing OMDb query).
fn parse_imdb_id(value: &str) -> Option<i64> {
    let value = normalize_na(value)?;
    let caps = OMDB_IMDB_ID_RE.captures(value)?;
    caps[1].parse().ok()
}

fn parse_rating(value: &str) -> Option<f64> {
    normalize_na(value)?.parse::<f64>().ok()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(normalize_na(value)?, RELEASE_DATE_FORMAT).ok()
}

/// Total runtime in seconds (hours·3600 + minutes·60); the `films` table
/// stores duration as an interval, not a bare minute count.
fn parse_duration(value: &str) -> Option<i32> {
    let value = normalize_na(value)?.replace(',', "");
    let caps = DURATION_RE.captures(&value)?;
    let hours: i32 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let minutes: i32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    if caps.get(1).is_none() && caps.get(2).is_none() {
        None
    } else {
        Some(hours * 3600 + minutes * 60)
    }
}

fn parse_year(value: &str) -> Option<i32> {
    normalize_na(value)?
        .chars()
        .take(4)
        .collect::<String>()
        .parse()
        .ok()
}

/// Reads and parses OMDb's `Year` field. Not a `films` column — the
/// system of record for a film's year is the article it resolved from —
/// this exists only so callers can cross-check OMDb's reported year
/// against the article year and log a mismatch.
pub(crate) fn parse_year_field(raw: &serde_json::Value) -> Option<i32> {
    parse_year(field(raw, "Year"))
}

/// Splits a comma-separated related-entity field ("Tom Hanks, Tim
/// Robbins, ...") into individual trimmed names, dropping empties and
/// "N/A", and deduplicating within this one film (a person listed twice
/// in the same field never yields two join rows for the same film).
fn parse_names(value: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();
    if let Some(value) = normalize_na(value) {
        for part in value.split(',') {
            let name = part.trim();
            if name.is_empty() || name.eq_ignore_ascii_case(NOT_AVAILABLE_VALUE_ALIAS) {
                continue;
            }
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }
    names
}

fn field<'a>(raw: &'a serde_json::Value, key: &str) -> &'a str {
    raw.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Turns one OMDb JSON payload plus the article it was resolved from
/// into a `Film` (with its related-entity names attached) and its
/// `Plot`. Returns `None` only when the payload has no usable imdb id —
/// everything else is allowed to be absent per I1.
pub fn deserialize_film(raw: &serde_json::Value, article_id: i64) -> Option<(Film, Plot)> {
    let imdb_id = parse_imdb_id(field(raw, "imdbID"))?;

    let plot = Plot::new(normalize_na(field(raw, "Plot")).map(str::to_string), None);

    let film = Film {
        id: None,
        article_id,
        plot_id: None,
        imdb_id,
        film_type: normalize_na(field(raw, "Type")).map(str::to_string),
        title: normalize_na(field(raw, "Title"))
            .unwrap_or_default()
            .to_string(),
        countries: normalize_na(field(raw, "Country")).map(str::to_string),
        languages: normalize_na(field(raw, "Language")).map(str::to_string),
        duration_seconds: parse_duration(field(raw, "Runtime")),
        release_date: parse_date(field(raw, "Released")),
        content_rating: parse_content_rating(field(raw, "Rated")),
        imdb_rating: parse_rating(field(raw, "imdbRating")),
        poster_url: normalize_na(field(raw, "Poster")).map(str::to_string),
        genres: parse_names(field(raw, "Genre")),
        directors: parse_names(field(raw, "Director")),
        writers: parse_names(field(raw, "Writer")),
        actors: parse_names(field(raw, "Actors")),
    };

    Some((film, plot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn na_sentinel_normalizes_to_none() {
        assert_eq!(normalize_na("N/A"), None);
        assert_eq!(normalize_na("n/a"), None);
        assert_eq!(normalize_na("  "), None);
        assert_eq!(normalize_na("Drama"), Some("Drama"));
    }

    #[test]
    fn content_rating_normalizes_unrated_variants() {
        assert_eq!(parse_content_rating("NOT RATED"), None);
        assert_eq!(parse_content_rating("UNRATED"), None);
        assert_eq!(parse_content_rating("N/A"), None);
        assert_eq!(parse_content_rating("R"), Some("R".to_string()));
    }

    #[test]
    fn imdb_id_requires_tt_prefix() {
        assert_eq!(parse_imdb_id("tt0111161"), Some(111161));
        assert_eq!(parse_imdb_id("0000001"), None);
        assert_eq!(parse_imdb_id("N/A"), None);
    }

    #[test]
    fn duration_handles_hours_and_minutes() {
        assert_eq!(parse_duration("2 h 16 min"), Some(8160));
        assert_eq!(parse_duration("142 min"), Some(8520));
        assert_eq!(parse_duration("1,420 min"), Some(85200));
        assert_eq!(parse_duration("N/A"), None);
    }

    #[test]
    fn release_date_uses_day_month_year_format() {
        assert_eq!(
            parse_date("14 Oct 1994"),
            Some(NaiveDate::from_ymd_opt(1994, 10, 14).unwrap())
        );
        assert_eq!(parse_date("N/A"), None);
    }

    #[test]
    fn names_are_split_trimmed_and_deduped() {
        assert_eq!(
            parse_names("Tom Hanks, Tim Robbins, Tom Hanks"),
            vec!["Tom Hanks".to_string(), "Tim Robbins".to_string()]
        );
        assert_eq!(parse_names("N/A"), Vec::<String>::new());
        assert_eq!(parse_names(""), Vec::<String>::new());
    }

    #[test]
    fn deserialize_film_requires_imdb_id() {
        let raw = json!({ "imdbID": "N/A", "Title": "Something" });
        assert!(deserialize_film(&raw, 1).is_none());
    }

    #[test]
    fn deserialize_film_allows_missing_plot_and_rating() {
        let raw = json!({
            "imdbID": "tt0111161",
            "Title": "The Shawshank Redemption",
            "Year": "1994",
            "Plot": "N/A",
            "imdbRating": "N/A",
        });
        let (film, plot) = deserialize_film(&raw, 1).unwrap();
        assert_eq!(film.imdb_id, 111161);
        assert_eq!(film.imdb_rating, None);
        assert!(plot.is_empty());
    }

    #[test]
    fn deserialize_film_reads_type_countries_languages_and_poster() {
        let raw = json!({
            "imdbID": "tt0133093",
            "Title": "The Matrix",
            "Type": "movie",
            "Country": "USA, Australia",
            "Language": "English",
            "Poster": "https://example.com/poster.jpg",
            "Runtime": "2 h 16 min",
        });
        let (film, _) = deserialize_film(&raw, 1).unwrap();
        assert_eq!(film.film_type, Some("movie".to_string()));
        assert_eq!(film.countries, Some("USA, Australia".to_string()));
        assert_eq!(film.languages, Some("English".to_string()));
        assert_eq!(film.poster_url, Some("https://example.com/poster.jpg".to_string()));
        assert_eq!(film.duration_seconds, Some(8160));
    }

    #[test]
    fn year_field_is_parsed_for_cross_checking_but_not_stored() {
        let raw = json!({ "imdbID": "tt0133093", "Year": "1999" });
        assert_eq!(parse_year_field(&raw), Some(1999));
    }
}
