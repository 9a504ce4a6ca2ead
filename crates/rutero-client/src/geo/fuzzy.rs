use strsim::jaro_winkler;

use crate::geo::gazetteer::{CountryEntry, GazetteerIndex};
use crate::normalize::NormalizedKey;

pub const MIN_FUZZY_KEY_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyCountryMatch<'a> {
    pub country: &'a CountryEntry,
    pub score: f64,
}

/// Best-scoring country for `key`, if it clears `min_similarity`.
///
/// Ties keep the earlier country in reference order.
pub fn best_country_match<'a>(
    gazetteer: &'a GazetteerIndex,
    key: &NormalizedKey,
    min_similarity: f64,
) -> Option<FuzzyCountryMatch<'a>> {
    let needle = key.as_str();
    if needle.chars().count() < MIN_FUZZY_KEY_LEN {
        return None;
    }

    let mut best: Option<FuzzyCountryMatch<'a>> = None;
    for country in gazetteer.countries() {
        let Some(candidate) = country.match_key.as_ref() else {
            continue;
        };
        let score = similarity(needle, candidate.as_str());
        let improves = best
            .as_ref()
            .map(|current| score > current.score)
            .unwrap_or(true);
        if improves {
            best = Some(FuzzyCountryMatch { country, score });
        }
    }

    best.filter(|found| found.score >= min_similarity)
}

/// A whole-word containment scores by how much of the country name it covers,
/// so a lone generic word ("SOUTH", "KINGDOM") stays under the floor.
fn similarity(needle: &str, candidate: &str) -> f64 {
    let edit = jaro_winkler(needle, candidate);
    if !contains_words(candidate, needle) {
        return edit;
    }
    let coverage = needle.chars().count() as f64 / candidate.chars().count() as f64;
    edit.max(coverage)
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    let haystack_words = haystack.split(' ').collect::<Vec<&str>>();
    let needle_words = needle.split(' ').collect::<Vec<&str>>();
    if needle_words.is_empty() || needle_words.len() > haystack_words.len() {
        return false;
    }
    haystack_words
        .windows(needle_words.len())
        .any(|window| window == needle_words.as_slice())
}
