use serde::Serialize;

use crate::normalize::NormalizedKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColombianRegion {
    Caribe,
    Andina,
    Pacifico,
    Orinoquia,
    Amazonia,
    Insular,
}

impl ColombianRegion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Caribe => "CARIBE",
            Self::Andina => "ANDINA",
            Self::Pacifico => "PACIFICO",
            Self::Orinoquia => "ORINOQUIA",
            Self::Amazonia => "AMAZONIA",
            Self::Insular => "INSULAR",
        }
    }
}

impl Serialize for ColombianRegion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// `None` entries are explicit "not informed" markers.
const ZONE_REGIONS: [(&str, Option<ColombianRegion>); 27] = [
    ("COSTA", Some(ColombianRegion::Caribe)),
    ("CARTAGENA", Some(ColombianRegion::Caribe)),
    ("SANTA MARTA", Some(ColombianRegion::Caribe)),
    ("BARRANQUILLA", Some(ColombianRegion::Caribe)),
    ("BOGOTA Y ALREDEDORES", Some(ColombianRegion::Andina)),
    ("BOGOTA", Some(ColombianRegion::Andina)),
    ("ANTIOQUIA", Some(ColombianRegion::Andina)),
    ("MEDELLIN", Some(ColombianRegion::Andina)),
    ("EJE CAFETERO", Some(ColombianRegion::Andina)),
    ("SANTANDERES", Some(ColombianRegion::Andina)),
    ("BOYACA", Some(ColombianRegion::Andina)),
    ("CUNDINAMARCA", Some(ColombianRegion::Andina)),
    ("TOLIMA", Some(ColombianRegion::Andina)),
    ("HUILA", Some(ColombianRegion::Andina)),
    ("CALI", Some(ColombianRegion::Andina)),
    ("SANTANDER", Some(ColombianRegion::Andina)),
    ("SUROCCIDENTE", Some(ColombianRegion::Pacifico)),
    ("CHOCO", Some(ColombianRegion::Pacifico)),
    ("LLANOS ORIENTALES", Some(ColombianRegion::Orinoquia)),
    ("LLANOS", Some(ColombianRegion::Orinoquia)),
    ("AMAZONAS", Some(ColombianRegion::Amazonia)),
    ("AMAZONIA", Some(ColombianRegion::Amazonia)),
    ("LETICIA", Some(ColombianRegion::Amazonia)),
    ("SAN ANDRES", Some(ColombianRegion::Insular)),
    ("SAN ANDRES ISLAS", Some(ColombianRegion::Insular)),
    ("NO INFORMA", None),
    ("DESCONOCIDO", None),
];

pub fn classify_region(key: Option<&NormalizedKey>) -> Option<ColombianRegion> {
    let key = key?;
    ZONE_REGIONS
        .iter()
        .find(|(zone, _)| *zone == key.as_str())
        .and_then(|(_, region)| *region)
}

pub fn region_table_len() -> usize {
    ZONE_REGIONS.len()
}
