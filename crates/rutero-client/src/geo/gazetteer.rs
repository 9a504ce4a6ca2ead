use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::geo::reference::ReferenceData;
use crate::normalize::{NormalizedKey, normalize_str};

/// Common Spanish names and abbreviations, resolved through the English
/// primary name already in the index.
const COUNTRY_ALIASES: [(&str, &str); 10] = [
    ("ESTADOS UNIDOS", "UNITED STATES"),
    ("USA", "UNITED STATES"),
    ("EEUU", "UNITED STATES"),
    ("EEU", "UNITED STATES"),
    ("EESTADOS UNIDOS", "UNITED STATES"),
    ("REINO UNIDO", "UNITED KINGDOM"),
    ("UK", "UNITED KINGDOM"),
    ("PAISES BAJOS", "NETHERLANDS"),
    ("NUEVA ZELANDA", "NEW ZEALAND"),
    ("NEW ZELANDA", "NEW ZEALAND"),
];

const MIN_ALTERNATE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    pub name: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    pub iso: String,
    pub name: String,
    pub continent_code: String,
    pub match_key: Option<NormalizedKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GazetteerStats {
    pub cities: usize,
    pub city_keys: usize,
    pub skipped_alternates: usize,
    pub city_collisions: usize,
    pub countries: usize,
    pub country_keys: usize,
    pub aliases_added: usize,
    pub continents: usize,
    pub skipped_records: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GazetteerIndex {
    cities: Vec<CityEntry>,
    countries: Vec<CountryEntry>,
    city_by_key: HashMap<NormalizedKey, usize>,
    country_by_key: HashMap<NormalizedKey, usize>,
    country_by_iso: HashMap<String, usize>,
    continent_names: HashMap<String, String>,
    stats: GazetteerStats,
}

impl GazetteerIndex {
    pub fn build(reference: &ReferenceData) -> Self {
        let mut index = Self::default();
        index.stats.skipped_records = reference.skipped_records;

        for continent in &reference.continents {
            index
                .continent_names
                .entry(continent.code.trim().to_string())
                .or_insert_with(|| continent.name.clone());
        }

        for country in &reference.countries {
            let position = index.countries.len();
            let match_key = normalize_str(&country.name);
            index.countries.push(CountryEntry {
                iso: country.iso.trim().to_string(),
                name: country.name.clone(),
                continent_code: country.continent_code.trim().to_string(),
                match_key: match_key.clone(),
            });
            index
                .country_by_iso
                .entry(country.iso.trim().to_string())
                .or_insert(position);
            if let Some(key) = match_key {
                index.country_by_key.entry(key).or_insert(position);
            }
            if let Some(iso3) = country.iso3.as_deref().and_then(normalize_str) {
                index.country_by_key.entry(iso3).or_insert(position);
            }
        }

        for (alias, target) in COUNTRY_ALIASES {
            let (Some(alias_key), Some(target_key)) = (normalize_str(alias), normalize_str(target))
            else {
                continue;
            };
            let Some(position) = index.country_by_key.get(&target_key).copied() else {
                continue;
            };
            if let Entry::Vacant(slot) = index.country_by_key.entry(alias_key) {
                slot.insert(position);
                index.stats.aliases_added += 1;
            }
        }

        for city in &reference.cities {
            let position = index.cities.len();
            index.cities.push(CityEntry {
                name: city.name.clone(),
                country_code: city.country_code.trim().to_string(),
            });

            if let Some(key) = normalize_str(&city.name) {
                index.insert_city_key(key, position);
            }
            for alternate in &city.alternate_names {
                let Some(key) = normalize_str(alternate) else {
                    continue;
                };
                if is_weak_alternate(&key) {
                    index.stats.skipped_alternates += 1;
                    continue;
                }
                index.insert_city_key(key, position);
            }
        }

        index.stats.cities = index.cities.len();
        index.stats.city_keys = index.city_by_key.len();
        index.stats.countries = index.countries.len();
        index.stats.country_keys = index.country_by_key.len();
        index.stats.continents = index.continent_names.len();

        tracing::debug!(
            city_keys = index.stats.city_keys,
            country_keys = index.stats.country_keys,
            skipped_alternates = index.stats.skipped_alternates,
            city_collisions = index.stats.city_collisions,
            "built gazetteer index"
        );
        index
    }

    fn insert_city_key(&mut self, key: NormalizedKey, position: usize) {
        match self.city_by_key.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
            Entry::Occupied(existing) => {
                if *existing.get() != position {
                    self.stats.city_collisions += 1;
                }
            }
        }
    }

    pub fn city(&self, key: &NormalizedKey) -> Option<&CityEntry> {
        self.city_by_key
            .get(key)
            .and_then(|position| self.cities.get(*position))
    }

    pub fn country(&self, key: &NormalizedKey) -> Option<&CountryEntry> {
        self.country_by_key
            .get(key)
            .and_then(|position| self.countries.get(*position))
    }

    pub fn country_by_iso(&self, iso: &str) -> Option<&CountryEntry> {
        self.country_by_iso
            .get(iso)
            .and_then(|position| self.countries.get(*position))
    }

    pub fn country_name_for_iso(&self, iso: &str) -> Option<&str> {
        self.country_by_iso(iso).map(|country| country.name.as_str())
    }

    pub fn continent_name(&self, code: &str) -> Option<&str> {
        self.continent_names.get(code).map(String::as_str)
    }

    pub fn countries(&self) -> &[CountryEntry] {
        &self.countries
    }

    pub fn stats(&self) -> &GazetteerStats {
        &self.stats
    }
}

fn is_weak_alternate(key: &NormalizedKey) -> bool {
    let value = key.as_str();
    value.chars().all(|character| character.is_ascii_digit())
        || value.chars().count() < MIN_ALTERNATE_LEN
}
