pub mod classify;
pub mod fuzzy;
pub mod gazetteer;
pub mod overrides;
pub mod reference;
pub mod region;
pub mod types;

use crate::ClientResult;
use crate::config::EngineSettings;
use classify::DestinationClassifier;
use gazetteer::GazetteerIndex;
use overrides::OverrideTable;

#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub gazetteer: GazetteerIndex,
    pub overrides: OverrideTable,
    pub fuzzy_min_similarity: f64,
}

impl ReferenceTables {
    pub fn load(settings: &EngineSettings) -> ClientResult<Self> {
        let reference = reference::load_reference(&settings.reference)?;
        let gazetteer = GazetteerIndex::build(&reference);
        let overrides = OverrideTable::load(settings.overrides.as_deref())?;
        Ok(Self {
            gazetteer,
            overrides,
            fuzzy_min_similarity: settings.fuzzy_min_similarity,
        })
    }

    pub fn classifier(&self) -> DestinationClassifier<'_> {
        DestinationClassifier::with_min_similarity(
            &self.overrides,
            &self.gazetteer,
            self.fuzzy_min_similarity,
        )
    }
}
