use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::circuit::Upstreams;
use crate::error::{HttpError, Result};
use crate::retry522::fetch_with_522_retry;

pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Titles that land in a film category by coincidence (franchise index
/// pages, disambiguation-adjacent titles that happen to intersect the
/// category) rather than by being a film article themselves.
static WIKILINKS_EXCEPTION: Lazy<[&'static str; 10]> = Lazy::new(|| {
    [
        "Keerthi Chakra",
        "A Thousand Acres",
        "Star Trek",
        "Star Wars",
        "Final Destination",
        "Diary of a Wimpy Kid",
        "Diary of a Wimpy Kid: Rodrick Rules",
        "Halloween H20: 20 Years Later (film)",
        "The Ten (film)",
        "On Line",
    ]
});

/// `regex` has no lookaround support, so this is `File:[^.]+\.` without
/// the lookbehind the original Python used — it doesn't need one.
static FILE_ATTACHMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"File:[^.]+\.").unwrap());

/// Is this PetScan hit actually a film article, not a list/index page, a
/// franchise-overview article caught by the category intersection, a TV
/// series sharing the category, or a stray file attachment link?
pub fn is_title_correct(title: &str) -> bool {
    !title.is_empty()
        && !(title.starts_with("List") && title.contains("of") && (title.contains("film") || title.contains("actor")))
        && !(title.contains("film") && title.contains("serie"))
        && !WIKILINKS_EXCEPTION.contains(&title)
        && !FILE_ATTACHMENT_RE.is_match(title)
}

/// `(?<=tt)(\d+)` in the original, rewritten as a capturing group since
/// `regex` has no lookbehind: `tt(\d+)`. Used against raw wikitext
/// returned by `expandtemplates`, where an imdb-id template parameter
/// may appear anywhere in the expanded text.
static WIKITEXT_IMDB_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"tt(\d+)").unwrap());

#[derive(Debug, Deserialize)]
struct ExpandTemplatesResponse {
    expandtemplates: ExpandTemplatesResult,
}

#[derive(Debug, Deserialize)]
struct ExpandTemplatesResult {
    wikitext: String,
}

/// Expands `{{Infobox film}}` (and any other templates) on the article
/// and scans the resulting wikitext for an IMDb id.
pub async fn resolve_imdb_id(
    client: &reqwest::Client,
    title: &str,
    retry_interval: Duration,
    breaker: &Upstreams,
) -> Result<Option<String>> {
    if !breaker.wikipedia.can_proceed() {
        return Err(HttpError::CircuitOpen("wikipedia".to_string()));
    }

    let response = fetch_with_522_retry("wikipedia", retry_interval, || {
        client
            .get(WIKIPEDIA_API_URL)
            .query(&[
                ("action", "expandtemplates"),
                ("format", "json"),
                ("prop", "wikitext"),
                ("title", title),
                ("text", "{{IMDb title}}"),
            ])
            .send()
    })
    .await;

    let response = match response {
        Ok(response) => {
            breaker.wikipedia.record_success();
            response
        }
        Err(err) => {
            breaker.wikipedia.record_failure();
            return Err(err);
        }
    };

    let parsed: ExpandTemplatesResponse = response.json().await.map_err(HttpError::Network)?;
    Ok(WIKITEXT_IMDB_ID_RE
        .captures(&parsed.expandtemplates.wikitext)
        .map(|caps| caps[1].to_string()))
}

const PLOT_SECTION_NAMES: [&str; 5] = ["Plot", "PlotEdit", "Synopsis", "Plot summary", "Plot synopsis"];

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParseResult>,
}

#[derive(Debug, Deserialize)]
struct ParseResult {
    wikitext: ParseWikitext,
}

#[derive(Debug, Deserialize)]
struct ParseWikitext {
    #[serde(rename = "*")]
    content: String,
}

/// Best-effort fetch of the article's plot section, concatenated across
/// every recognized section heading. A miss (no matching section, a
/// malformed response, a network failure) is not an error — it simply
/// leaves `plot.wikipedia_content` null, since a film with only an OMDb
/// plot is a perfectly valid row (I1).
pub async fn fetch_plot_section(client: &reqwest::Client, title: &str) -> Option<String> {
    let response = client
        .get(WIKIPEDIA_API_URL)
        .query(&[
            ("action", "parse"),
            ("format", "json"),
            ("prop", "wikitext"),
            ("page", title),
        ])
        .send()
        .await
        .ok()?;

    let parsed: ParseResponse = response.json().await.ok()?;
    let wikitext = parsed.parse?.wikitext.content;
    let sections = extract_named_sections(&wikitext, &PLOT_SECTION_NAMES);
    if sections.is_empty() {
        warn!(title, "no plot section found");
        None
    } else {
        debug!(title, sections = sections.len(), "found plot section(s)");
        Some(sections.join("\n"))
    }
}

fn extract_named_sections(wikitext: &str, names: &[&str]) -> Vec<String> {
    let mut sections = Vec::new();
    let lines: Vec<&str> = wikitext.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if let Some(heading) = parse_heading(line) {
            if names.iter().any(|name| name.eq_ignore_ascii_case(heading)) {
                let mut body = Vec::new();
                i += 1;
                while i < lines.len() && parse_heading(lines[i].trim()).is_none() {
                    body.push(lines[i]);
                    i += 1;
                }
                sections.push(body.join("\n").trim().to_string());
                continue;
            }
        }
        i += 1;
    }
    sections
}

fn parse_heading(line: &str) -> Option<&str> {
    if line.starts_with("==") && line.ends_with("==") && line.len() > 4 {
        Some(line.trim_matches('=').trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_list_of_film_titles() {
        assert!(!is_title_correct("List of war films"));
    }

    #[test]
    fn rejects_film_series_titles() {
        assert!(!is_title_correct("Supernatural (film series)"));
    }

    #[test]
    fn rejects_exclusion_set_titles() {
        assert!(!is_title_correct("Star Wars"));
        assert!(!is_title_correct("Star Trek"));
        assert!(!is_title_correct("On Line"));
    }

    #[test]
    fn accepts_ordinary_film_title() {
        assert!(is_title_correct("The Shawshank Redemption"));
    }

    #[test]
    fn rejects_file_attachment_titles() {
        assert!(!is_title_correct("File:Poster.jpg"));
    }

    #[test]
    fn rejects_empty_titles() {
        assert!(!is_title_correct(""));
    }

    #[test]
    fn wikitext_imdb_regex_extracts_digits_after_tt() {
        let caps = WIKITEXT_IMDB_ID_RE.captures("| imdb_id = tt0111161").unwrap();
        assert_eq!(&caps[1], "0111161");
    }

    #[test]
    fn extract_named_sections_finds_plot_heading() {
        let wikitext = "== Cast ==\nSome cast\n\n== Plot ==\nA prisoner escapes.\n\n== Reception ==\nGood.";
        let sections = extract_named_sections(wikitext, &PLOT_SECTION_NAMES);
        assert_eq!(sections, vec!["A prisoner escapes.".to_string()]);
    }
}
