pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, TomlConfig};

pub use core::{engine::SuggestionEngine, pipeline::SuggestionPipeline};
pub use domain::model::{Golfer, SuggestionRun, TeamKind, TeamMember, TeamSuggestion};
pub use domain::services::suggest_teams;
pub use utils::error::{Result, TeamError};
