use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::geo::reference::ReferenceSource;
use crate::{ClientError, ClientResult};

pub const DEFAULT_DOMESTIC_COUNTRY: &str = "Colombia";
pub const DEFAULT_FUZZY_MIN_SIMILARITY: f64 = 0.90;

const GAZETTEER_VAR: &str = "RUTERO_GAZETTEER";
const GEONAMES_CITIES_VAR: &str = "RUTERO_GEONAMES_CITIES";
const GEONAMES_COUNTRIES_VAR: &str = "RUTERO_GEONAMES_COUNTRIES";
const OVERRIDES_VAR: &str = "RUTERO_OVERRIDES";
const DOMESTIC_COUNTRY_VAR: &str = "RUTERO_DOMESTIC_COUNTRY";
const FUZZY_MIN_SIMILARITY_VAR: &str = "RUTERO_FUZZY_MIN_SIMILARITY";

/// Explicit settings; any field left `None` falls back to the environment,
/// then to the built-in default.
#[derive(Debug, Clone, Default)]
pub struct EngineOverrides<'a> {
    pub gazetteer: Option<&'a Path>,
    pub geonames_cities: Option<&'a Path>,
    pub geonames_countries: Option<&'a Path>,
    pub overrides: Option<&'a Path>,
    pub domestic_country: Option<&'a str>,
    pub fuzzy_min_similarity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub reference: ReferenceSource,
    pub overrides: Option<PathBuf>,
    pub domestic_country: String,
    pub fuzzy_min_similarity: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reference: ReferenceSource::Bundled,
            overrides: None,
            domestic_country: DEFAULT_DOMESTIC_COUNTRY.to_string(),
            fuzzy_min_similarity: DEFAULT_FUZZY_MIN_SIMILARITY,
        }
    }
}

pub fn resolve_settings(explicit: &EngineOverrides<'_>) -> ClientResult<EngineSettings> {
    resolve_settings_from(explicit, |name| std::env::var_os(name))
}

fn resolve_settings_from<F>(explicit: &EngineOverrides<'_>, env: F) -> ClientResult<EngineSettings>
where
    F: Fn(&str) -> Option<OsString>,
{
    let env_path = |name: &str| {
        env(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    };

    let gazetteer = explicit
        .gazetteer
        .map(Path::to_path_buf)
        .or_else(|| env_path(GAZETTEER_VAR));
    let geonames_cities = explicit
        .geonames_cities
        .map(Path::to_path_buf)
        .or_else(|| env_path(GEONAMES_CITIES_VAR));
    let geonames_countries = explicit
        .geonames_countries
        .map(Path::to_path_buf)
        .or_else(|| env_path(GEONAMES_COUNTRIES_VAR));

    let reference = match (gazetteer, geonames_cities, geonames_countries) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(ClientError::invalid_argument_with_recovery(
                "Choose either a JSON gazetteer or GeoNames dumps, not both.",
                vec![format!(
                    "Unset `{GAZETTEER_VAR}` or unset `{GEONAMES_CITIES_VAR}`/`{GEONAMES_COUNTRIES_VAR}`."
                )],
            ));
        }
        (Some(path), None, None) => ReferenceSource::JsonFile(path),
        (None, Some(cities), Some(countries)) => ReferenceSource::GeoNames { cities, countries },
        (None, Some(_), None) | (None, None, Some(_)) => {
            return Err(ClientError::invalid_argument_with_recovery(
                "GeoNames reference data needs both a cities dump and countryInfo.txt.",
                vec![format!(
                    "Set both `{GEONAMES_CITIES_VAR}` and `{GEONAMES_COUNTRIES_VAR}`."
                )],
            ));
        }
        (None, None, None) => ReferenceSource::Bundled,
    };

    let overrides = explicit
        .overrides
        .map(Path::to_path_buf)
        .or_else(|| env_path(OVERRIDES_VAR));

    let domestic_country = match explicit.domestic_country {
        Some(value) => value.trim().to_string(),
        None => env(DOMESTIC_COUNTRY_VAR)
            .map(|value| value.to_string_lossy().trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DOMESTIC_COUNTRY.to_string()),
    };
    if domestic_country.is_empty() {
        return Err(ClientError::invalid_setting(
            DOMESTIC_COUNTRY_VAR,
            "",
            "a non-empty country name",
        ));
    }

    let fuzzy_min_similarity = match explicit.fuzzy_min_similarity {
        Some(value) => validate_similarity(value, &value.to_string())?,
        None => match env(FUZZY_MIN_SIMILARITY_VAR) {
            Some(raw) => {
                let text = raw.to_string_lossy().trim().to_string();
                let parsed = text.parse::<f64>().map_err(|_| {
                    ClientError::invalid_setting(FUZZY_MIN_SIMILARITY_VAR, &text, "a number between 0 and 1")
                })?;
                validate_similarity(parsed, &text)?
            }
            None => DEFAULT_FUZZY_MIN_SIMILARITY,
        },
    };

    Ok(EngineSettings {
        reference,
        overrides,
        domestic_country,
        fuzzy_min_similarity,
    })
}

fn validate_similarity(value: f64, raw: &str) -> ClientResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        return Ok(value);
    }
    Err(ClientError::invalid_setting(
        FUZZY_MIN_SIMILARITY_VAR,
        raw,
        "a number between 0 and 1",
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    use super::{
        DEFAULT_FUZZY_MIN_SIMILARITY, EngineOverrides, EngineSettings, resolve_settings_from,
    };
    use crate::geo::reference::ReferenceSource;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), OsString::from(*value)))
            .collect::<HashMap<String, OsString>>();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let settings = resolve_settings_from(&EngineOverrides::default(), env_of(&[]));
        assert!(settings.is_ok());
        if let Ok(resolved) = settings {
            assert_eq!(resolved, EngineSettings::default());
        }
    }

    #[test]
    fn environment_fills_unset_options_and_options_win() {
        let env = env_of(&[
            ("RUTERO_DOMESTIC_COUNTRY", "Peru"),
            ("RUTERO_FUZZY_MIN_SIMILARITY", "0.85"),
            ("RUTERO_GAZETTEER", "/data/world.json"),
        ]);
        let explicit = EngineOverrides {
            domestic_country: Some("Ecuador"),
            ..EngineOverrides::default()
        };
        let settings = resolve_settings_from(&explicit, env);
        assert!(settings.is_ok());
        if let Ok(resolved) = settings {
            assert_eq!(resolved.domestic_country, "Ecuador");
            assert!((resolved.fuzzy_min_similarity - 0.85).abs() < f64::EPSILON);
            assert_eq!(
                resolved.reference,
                ReferenceSource::JsonFile(PathBuf::from("/data/world.json"))
            );
        }
    }

    #[test]
    fn similarity_outside_unit_range_is_rejected() {
        for raw in ["1.5", "-0.1", "high", "NaN"] {
            let result = resolve_settings_from(
                &EngineOverrides::default(),
                env_of(&[("RUTERO_FUZZY_MIN_SIMILARITY", raw)]),
            );
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "invalid_argument");
            }
        }
        let explicit = EngineOverrides {
            fuzzy_min_similarity: Some(DEFAULT_FUZZY_MIN_SIMILARITY),
            ..EngineOverrides::default()
        };
        assert!(resolve_settings_from(&explicit, env_of(&[])).is_ok());
    }

    #[test]
    fn geonames_requires_both_dumps_and_excludes_json() {
        let half = resolve_settings_from(
            &EngineOverrides::default(),
            env_of(&[("RUTERO_GEONAMES_CITIES", "/data/cities15000.txt")]),
        );
        assert!(half.is_err());

        let both = EngineOverrides {
            geonames_cities: Some(Path::new("/data/cities15000.txt")),
            geonames_countries: Some(Path::new("/data/countryInfo.txt")),
            ..EngineOverrides::default()
        };
        let resolved = resolve_settings_from(&both, env_of(&[]));
        assert!(resolved.is_ok());
        if let Ok(settings) = resolved {
            assert!(matches!(settings.reference, ReferenceSource::GeoNames { .. }));
        }

        let conflicting = resolve_settings_from(
            &both,
            env_of(&[("RUTERO_GAZETTEER", "/data/world.json")]),
        );
        assert!(conflicting.is_err());
    }
}
