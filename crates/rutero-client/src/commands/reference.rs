use crate::ClientResult;
use crate::config::{EngineOverrides, resolve_settings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{OverrideStats, ReferenceStatsData};
use crate::geo::ReferenceTables;
use crate::geo::region::region_table_len;

pub fn stats() -> ClientResult<SuccessEnvelope> {
    stats_with_options(EngineOverrides::default())
}

#[doc(hidden)]
pub fn stats_with_options(engine: EngineOverrides<'_>) -> ClientResult<SuccessEnvelope> {
    let settings = resolve_settings(&engine)?;
    let tables = ReferenceTables::load(&settings)?;

    let overrides_source = settings
        .overrides
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "bundled override table".to_string());

    let data = ReferenceStatsData {
        reference_source: settings.reference.describe(),
        gazetteer: tables.gazetteer.stats().clone(),
        overrides: OverrideStats {
            source: overrides_source,
            rows_read: tables.overrides.rows_read() as i64,
            keys: tables.overrides.len() as i64,
            discard_keys: tables.overrides.discard_count() as i64,
        },
        region_zones: region_table_len() as i64,
        domestic_country: settings.domestic_country,
        fuzzy_min_similarity: settings.fuzzy_min_similarity,
    };
    success("reference stats", data)
}
