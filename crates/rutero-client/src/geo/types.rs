use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DestinationType {
    Ciudad,
    Pais,
    Continente,
    Isla,
    RegionGeo,
    RegionCol,
    Tour,
    Crucero,
    SitioTuristico,
    HotelLugar,
    Lugar,
    Concepto,
    Aeropuerto,
    Atraccion,
    Otro,
    NoClasificado,
}

impl DestinationType {
    pub const ALL: [DestinationType; 16] = [
        Self::Ciudad,
        Self::Pais,
        Self::Continente,
        Self::Isla,
        Self::RegionGeo,
        Self::RegionCol,
        Self::Tour,
        Self::Crucero,
        Self::SitioTuristico,
        Self::HotelLugar,
        Self::Lugar,
        Self::Concepto,
        Self::Aeropuerto,
        Self::Atraccion,
        Self::Otro,
        Self::NoClasificado,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ciudad => "CIUDAD",
            Self::Pais => "PAIS",
            Self::Continente => "CONTINENTE",
            Self::Isla => "ISLA",
            Self::RegionGeo => "REGION GEO",
            Self::RegionCol => "REGION COL",
            Self::Tour => "TOUR",
            Self::Crucero => "CRUCERO",
            Self::SitioTuristico => "SITIO TURISTICO",
            Self::HotelLugar => "HOTEL/LUGAR",
            Self::Lugar => "LUGAR",
            Self::Concepto => "CONCEPTO",
            Self::Aeropuerto => "AEROPUERTO",
            Self::Atraccion => "ATRACCION",
            Self::Otro => "OTRO",
            Self::NoClasificado => "NO CLASIFICADO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Types whose canonical name is a real place name. Descriptive types
    /// (tours, concepts, hotels…) fall back to the lookup key as their label.
    pub const fn is_geographic(self) -> bool {
        matches!(
            self,
            Self::Ciudad
                | Self::Pais
                | Self::Continente
                | Self::Isla
                | Self::RegionGeo
                | Self::RegionCol
        )
    }
}

impl Serialize for DestinationType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The (type, name, country, continent) tuple produced for one destination.
///
/// Either every field is `None` (discard) or `kind` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub kind: Option<DestinationType>,
    pub name: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
}

impl ClassificationResult {
    pub fn discard() -> Self {
        Self::default()
    }

    pub fn unclassified(key: &str) -> Self {
        Self {
            kind: Some(DestinationType::NoClasificado),
            name: Some(key.to_string()),
            country: None,
            continent: None,
        }
    }

    pub fn city(name: &str, country: &str, continent: &str) -> Self {
        Self {
            kind: Some(DestinationType::Ciudad),
            name: Some(name.to_string()),
            country: Some(country.to_string()),
            continent: Some(continent.to_string()),
        }
    }

    pub fn country(country: &str, continent: &str) -> Self {
        Self {
            kind: Some(DestinationType::Pais),
            name: None,
            country: Some(country.to_string()),
            continent: Some(continent.to_string()),
        }
    }

    pub fn is_discard(&self) -> bool {
        self.kind.is_none()
            && self.name.is_none()
            && self.country.is_none()
            && self.continent.is_none()
    }

    pub fn is_unclassified(&self) -> bool {
        self.kind == Some(DestinationType::NoClasificado)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContinentRecord {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountryRecord {
    pub iso: String,
    #[serde(default)]
    pub iso3: Option<String>,
    pub name: String,
    pub continent_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CityRecord {
    pub name: String,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    pub country_code: String,
}
