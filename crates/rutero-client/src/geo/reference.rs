use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::geo::types::{CityRecord, ContinentRecord, CountryRecord};
use crate::{ClientError, ClientResult};

const BUNDLED_GAZETTEER: &str = include_str!("../../data/gazetteer.json");

const GEONAMES_CONTINENTS: [(&str, &str); 7] = [
    ("AF", "Africa"),
    ("AS", "Asia"),
    ("EU", "Europe"),
    ("NA", "North America"),
    ("OC", "Oceania"),
    ("SA", "South America"),
    ("AN", "Antarctica"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Bundled,
    JsonFile(PathBuf),
    GeoNames { cities: PathBuf, countries: PathBuf },
}

impl ReferenceSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled gazetteer".to_string(),
            Self::JsonFile(path) => format!("`{}`", path.display()),
            Self::GeoNames { cities, countries } => format!(
                "GeoNames dumps `{}` + `{}`",
                cities.display(),
                countries.display()
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub continents: Vec<ContinentRecord>,
    #[serde(default)]
    pub countries: Vec<CountryRecord>,
    #[serde(default)]
    pub cities: Vec<CityRecord>,
    /// Dump lines that could not be read as a record.
    #[serde(skip)]
    pub skipped_records: usize,
}

pub fn load_reference(source: &ReferenceSource) -> ClientResult<ReferenceData> {
    let data = match source {
        ReferenceSource::Bundled => parse_gazetteer_json(BUNDLED_GAZETTEER, &source.describe())?,
        ReferenceSource::JsonFile(path) => {
            let body = read_reference_file(path, source)?;
            parse_gazetteer_json(&body, &source.describe())?
        }
        ReferenceSource::GeoNames { cities, countries } => {
            let cities_body = read_reference_file(cities, source)?;
            let countries_body = read_reference_file(countries, source)?;
            parse_geonames(&cities_body, &countries_body)
        }
    };

    if data.countries.is_empty() || data.continents.is_empty() {
        return Err(ClientError::reference_data_unavailable(
            &source.describe(),
            "no countries or continents were found",
        ));
    }

    tracing::info!(
        source = %source.describe(),
        continents = data.continents.len(),
        countries = data.countries.len(),
        cities = data.cities.len(),
        skipped = data.skipped_records,
        "loaded geographic reference data"
    );
    Ok(data)
}

fn read_reference_file(path: &Path, source: &ReferenceSource) -> ClientResult<String> {
    fs::read_to_string(path).map_err(|error| {
        ClientError::reference_data_unavailable(
            &source.describe(),
            &format!("`{}`: {error}", path.display()),
        )
    })
}

pub fn parse_gazetteer_json(body: &str, source_label: &str) -> ClientResult<ReferenceData> {
    serde_json::from_str::<ReferenceData>(body)
        .map_err(|error| ClientError::reference_data_unavailable(source_label, &error.to_string()))
}

pub fn parse_geonames(cities_body: &str, countries_body: &str) -> ReferenceData {
    let mut data = ReferenceData {
        continents: GEONAMES_CONTINENTS
            .iter()
            .map(|(code, name)| ContinentRecord {
                code: (*code).to_string(),
                name: (*name).to_string(),
            })
            .collect(),
        ..ReferenceData::default()
    };

    for line in countries_body.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_country_line(line) {
            Some(country) => data.countries.push(country),
            None => {
                tracing::warn!(line = %line, "skipped malformed countryInfo line");
                data.skipped_records += 1;
            }
        }
    }

    for line in cities_body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_city_line(line) {
            Some(city) => data.cities.push(city),
            None => {
                tracing::warn!(line = %line, "skipped malformed GeoNames city line");
                data.skipped_records += 1;
            }
        }
    }

    data
}

fn parse_country_line(line: &str) -> Option<CountryRecord> {
    let fields = line.split('\t').collect::<Vec<&str>>();
    if fields.len() < 9 {
        return None;
    }
    let iso = non_empty(fields[0])?;
    let name = non_empty(fields[4])?;
    let continent_code = non_empty(fields[8])?;
    Some(CountryRecord {
        iso,
        iso3: non_empty(fields[1]),
        name,
        continent_code,
    })
}

fn parse_city_line(line: &str) -> Option<CityRecord> {
    let fields = line.split('\t').collect::<Vec<&str>>();
    if fields.len() < 9 {
        return None;
    }
    let name = non_empty(fields[1])?;
    let country_code = non_empty(fields[8])?;
    let alternate_names = fields[3]
        .split(',')
        .filter_map(non_empty)
        .collect::<Vec<String>>();
    Some(CityRecord {
        name,
        alternate_names,
        country_code,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{ReferenceSource, load_reference, parse_gazetteer_json, parse_geonames};

    const COUNTRY_INFO: &str = "#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea\tPopulation\tContinent\n\
CO\tCOL\t170\tCO\tColombia\tBogota\t1138910\t49648685\tSA\n\
PE\tPER\t604\tPE\tPeru\tLima\t1285220\t31989256\tSA\n\
XX\tbroken\n";

    const CITIES: &str = "3687238\tCartagena\tCartagena\tCartagena de Indias,Kartakhena,CTG\t10.39\t-75.51\tP\tPPLA\tCO\n\
3936456\tLima\tLima\tLima,Lime,,Ciudad de los Reyes\t-12.04\t-77.02\tP\tPPLC\tPE\n\
short\tline\n";

    #[test]
    fn bundled_gazetteer_loads_with_colombia_and_cartagena() {
        let loaded = load_reference(&ReferenceSource::Bundled);
        assert!(loaded.is_ok());
        if let Ok(data) = loaded {
            assert!(data.continents.iter().any(|continent| continent.code == "SA"));
            assert!(
                data.countries
                    .iter()
                    .any(|country| country.iso == "CO" && country.name == "Colombia")
            );
            assert!(data.cities.iter().any(|city| city.name == "Cartagena"));
        }
    }

    #[test]
    fn geonames_dumps_skip_comments_and_malformed_lines() {
        let data = parse_geonames(CITIES, COUNTRY_INFO);
        assert_eq!(data.countries.len(), 2);
        assert_eq!(data.countries[0].iso3.as_deref(), Some("COL"));
        assert_eq!(data.countries[1].continent_code, "SA");
        assert_eq!(data.cities.len(), 2);
        assert_eq!(data.cities[1].alternate_names, vec!["Lima", "Lime", "Ciudad de los Reyes"]);
        assert_eq!(data.skipped_records, 2);
        assert_eq!(data.continents.len(), 7);
    }

    #[test]
    fn unreadable_sources_are_reference_failures() {
        let missing = load_reference(&ReferenceSource::JsonFile(
            "/nonexistent/rutero/gazetteer.json".into(),
        ));
        assert!(missing.is_err());
        if let Err(error) = missing {
            assert_eq!(error.code, "reference_data_unavailable");
        }

        let garbled = parse_gazetteer_json("{\"countries\": 12}", "inline");
        assert!(garbled.is_err());
    }
}
