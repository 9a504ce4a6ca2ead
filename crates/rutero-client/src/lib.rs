pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod export;
pub mod geo;
pub mod ingest;
pub mod master;
pub mod normalize;
pub mod pipeline;
pub mod suppliers;

pub use config::{EngineOverrides, EngineSettings, resolve_settings};
pub use contracts::envelope::SuccessEnvelope;
pub use error::{ClientError, ClientResult};
pub use geo::ReferenceTables;
pub use geo::classify::DestinationClassifier;
pub use geo::types::{ClassificationResult, DestinationType};
pub use normalize::{NormalizedKey, normalize_label};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
