use crate::cli::{Commands, ReferenceCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl From<bool> for OutputMode {
    fn from(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Build { json, .. }
        | Commands::Classify { json, .. }
        | Commands::Reference {
            command: ReferenceCommand::Stats { json, .. },
        } => OutputMode::from(*json),
    }
}
