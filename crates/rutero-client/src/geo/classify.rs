use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::config::DEFAULT_FUZZY_MIN_SIMILARITY;
use crate::geo::fuzzy::best_country_match;
use crate::geo::gazetteer::GazetteerIndex;
use crate::geo::overrides::OverrideTable;
use crate::geo::types::ClassificationResult;
use crate::normalize::NormalizedKey;

pub trait DestinationResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` passes the key on to the next resolver.
    fn resolve(&self, key: &NormalizedKey) -> Option<ClassificationResult>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCodeFilter;

impl DestinationResolver for ReferenceCodeFilter {
    fn name(&self) -> &'static str {
        "reference_code"
    }

    fn resolve(&self, key: &NormalizedKey) -> Option<ClassificationResult> {
        is_reference_code(key.as_str()).then(ClassificationResult::discard)
    }
}

pub fn is_reference_code(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if value.chars().all(|character| character.is_ascii_digit()) {
        return true;
    }

    let bytes = value.as_bytes();
    let letters = bytes.iter().take_while(|byte| byte.is_ascii_uppercase()).count();
    if (2..=4).contains(&letters)
        && letters < bytes.len()
        && bytes[letters..].iter().all(u8::is_ascii_digit)
    {
        return true;
    }

    let digits = bytes.iter().take_while(|byte| byte.is_ascii_digit()).count();
    let tail = bytes.len() - digits;
    if digits > 0
        && (2..=4).contains(&tail)
        && bytes[digits..].iter().all(u8::is_ascii_uppercase)
    {
        return true;
    }

    bytes.len() >= 8
        && bytes
            .iter()
            .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
        && bytes.iter().any(u8::is_ascii_digit)
}

pub struct OverrideResolver<'a> {
    overrides: &'a OverrideTable,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(overrides: &'a OverrideTable) -> Self {
        Self { overrides }
    }
}

impl DestinationResolver for OverrideResolver<'_> {
    fn name(&self) -> &'static str {
        "override"
    }

    fn resolve(&self, key: &NormalizedKey) -> Option<ClassificationResult> {
        let entry = self.overrides.get(key)?;
        if entry.is_discard() {
            return Some(ClassificationResult::discard());
        }

        let mut result = entry.clone();
        if let Some(kind) = result.kind
            && !kind.is_geographic()
            && result.name.is_none()
        {
            result.name = Some(key.as_str().to_string());
        }
        Some(result)
    }
}

pub struct CityResolver<'a> {
    gazetteer: &'a GazetteerIndex,
}

impl<'a> CityResolver<'a> {
    pub fn new(gazetteer: &'a GazetteerIndex) -> Self {
        Self { gazetteer }
    }
}

impl DestinationResolver for CityResolver<'_> {
    fn name(&self) -> &'static str {
        "city"
    }

    fn resolve(&self, key: &NormalizedKey) -> Option<ClassificationResult> {
        let city = self.gazetteer.city(key)?;
        let country = self.gazetteer.country_by_iso(&city.country_code)?;
        let continent = self.gazetteer.continent_name(&country.continent_code)?;
        Some(ClassificationResult::city(&city.name, &country.name, continent))
    }
}

pub struct CountryResolver<'a> {
    gazetteer: &'a GazetteerIndex,
}

impl<'a> CountryResolver<'a> {
    pub fn new(gazetteer: &'a GazetteerIndex) -> Self {
        Self { gazetteer }
    }
}

impl DestinationResolver for CountryResolver<'_> {
    fn name(&self) -> &'static str {
        "country"
    }

    fn resolve(&self, key: &NormalizedKey) -> Option<ClassificationResult> {
        let country = self.gazetteer.country(key)?;
        let continent = self.gazetteer.continent_name(&country.continent_code)?;
        Some(ClassificationResult::country(&country.name, continent))
    }
}

pub struct FuzzyCountryResolver<'a> {
    gazetteer: &'a GazetteerIndex,
    min_similarity: f64,
}

impl<'a> FuzzyCountryResolver<'a> {
    pub fn new(gazetteer: &'a GazetteerIndex, min_similarity: f64) -> Self {
        Self {
            gazetteer,
            min_similarity,
        }
    }
}

impl DestinationResolver for FuzzyCountryResolver<'_> {
    fn name(&self) -> &'static str {
        "fuzzy_country"
    }

    fn resolve(&self, key: &NormalizedKey) -> Option<ClassificationResult> {
        let found = best_country_match(self.gazetteer, key, self.min_similarity)?;
        let continent = self
            .gazetteer
            .continent_name(&found.country.continent_code)?;
        tracing::debug!(
            key = %key,
            country = %found.country.name,
            score = found.score,
            "approximate country match"
        );
        Some(ClassificationResult::country(&found.country.name, continent))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    pub result: ClassificationResult,
    /// Name of the resolver that answered; `empty` or `unresolved` otherwise.
    pub resolver: &'static str,
}

pub struct DestinationClassifier<'a> {
    resolvers: Vec<Box<dyn DestinationResolver + 'a>>,
}

impl<'a> DestinationClassifier<'a> {
    pub fn new(overrides: &'a OverrideTable, gazetteer: &'a GazetteerIndex) -> Self {
        Self::with_min_similarity(overrides, gazetteer, DEFAULT_FUZZY_MIN_SIMILARITY)
    }

    pub fn with_min_similarity(
        overrides: &'a OverrideTable,
        gazetteer: &'a GazetteerIndex,
        min_similarity: f64,
    ) -> Self {
        Self::from_resolvers(vec![
            Box::new(ReferenceCodeFilter),
            Box::new(OverrideResolver::new(overrides)),
            Box::new(CityResolver::new(gazetteer)),
            Box::new(CountryResolver::new(gazetteer)),
            Box::new(FuzzyCountryResolver::new(gazetteer, min_similarity)),
        ])
    }

    pub fn from_resolvers(resolvers: Vec<Box<dyn DestinationResolver + 'a>>) -> Self {
        Self { resolvers }
    }

    pub fn classify(&self, key: Option<&NormalizedKey>) -> ClassificationResult {
        self.classify_traced(key).result
    }

    pub fn classify_traced(&self, key: Option<&NormalizedKey>) -> ResolvedDestination {
        let Some(key) = key else {
            return ResolvedDestination {
                result: ClassificationResult::discard(),
                resolver: "empty",
            };
        };

        for resolver in &self.resolvers {
            if let Some(result) = resolver.resolve(key) {
                return ResolvedDestination {
                    result,
                    resolver: resolver.name(),
                };
            }
        }

        tracing::debug!(key = %key, "destination unresolved");
        ResolvedDestination {
            result: ClassificationResult::unclassified(key.as_str()),
            resolver: "unresolved",
        }
    }

    pub fn classify_all<'k, I>(&self, keys: I) -> BTreeMap<NormalizedKey, ClassificationResult>
    where
        I: IntoIterator<Item = &'k NormalizedKey>,
    {
        let distinct = keys.into_iter().collect::<BTreeSet<&NormalizedKey>>();
        distinct
            .into_par_iter()
            .map(|key| (key.clone(), self.classify(Some(key))))
            .collect()
    }
}
