use rutero_client::commands;
use rutero_client::commands::build::BuildOptions;
use rutero_client::commands::classify::ClassifyOptions;
use rutero_client::{ClientResult, EngineOverrides, SuccessEnvelope};

use crate::cli::{Cli, Commands, EngineArgs, ReferenceCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Build {
            input_dir,
            raw,
            out,
            engine,
            ..
        } => commands::build::run_with_options(BuildOptions {
            input_dir: input_dir.clone(),
            raw: *raw,
            out: out.clone(),
            engine: engine_overrides(engine),
        }),
        Commands::Classify { labels, engine, .. } => {
            commands::classify::run_with_options(ClassifyOptions {
                labels: labels.clone(),
                engine: engine_overrides(engine),
            })
        }
        Commands::Reference { command } => match command {
            ReferenceCommand::Stats { engine, .. } => {
                commands::reference::stats_with_options(engine_overrides(engine))
            }
        },
    }
}

fn engine_overrides(args: &EngineArgs) -> EngineOverrides<'_> {
    EngineOverrides {
        gazetteer: args.gazetteer.as_deref(),
        geonames_cities: args.geonames_cities.as_deref(),
        geonames_countries: args.geonames_countries.as_deref(),
        overrides: args.overrides.as_deref(),
        domestic_country: args.domestic_country.as_deref(),
        fuzzy_min_similarity: args.fuzzy_min_similarity,
    }
}
