use crate::config::{EngineOverrides, resolve_settings};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ClassifyData, ClassifyRow};
use crate::geo::ReferenceTables;
use crate::normalize::{NormalizedKey, normalize_str};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ClassifyOptions<'a> {
    pub labels: Vec<String>,
    pub engine: EngineOverrides<'a>,
}

pub fn run(labels: Vec<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ClassifyOptions {
        labels,
        engine: EngineOverrides::default(),
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ClassifyOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.labels.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Provide at least one destination label to classify.",
            Some("classify"),
        ));
    }

    let settings = resolve_settings(&options.engine)?;
    let tables = ReferenceTables::load(&settings)?;
    let classifier = tables.classifier();

    let rows = options
        .labels
        .into_iter()
        .map(|input| {
            let key = normalize_str(&input);
            let resolved = classifier.classify_traced(key.as_ref());
            ClassifyRow {
                normalized_key: key.map(NormalizedKey::into_string),
                resolver: resolved.resolver.to_string(),
                result: resolved.result,
                input,
            }
        })
        .collect::<Vec<ClassifyRow>>();

    success(
        "classify",
        ClassifyData {
            reference_source: settings.reference.describe(),
            rows,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{ClassifyOptions, run_with_options};

    #[test]
    fn classify_requires_labels() {
        let result = run_with_options(ClassifyOptions::default());
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}
