use crate::adapters::RegistrantSource;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ZIP_NAME: &str = "team_suggestions.zip";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "golf-team-builder")]
#[command(about = "Suggest four-person tournament teams from registrations and teammate preferences")]
pub struct CliConfig {
    /// Registrant source: an http(s) endpoint, or a .json / .csv file
    #[arg(long)]
    pub source: String,

    /// Force the source type (api, json, csv) instead of inferring it
    #[arg(long)]
    pub source_type: Option<String>,

    /// File with ids already on a persisted team (JSON array or one per line)
    #[arg(long)]
    pub assigned: Option<String>,

    /// Ids already on a persisted team, comma separated
    #[arg(long, value_delimiter = ',')]
    pub assigned_ids: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json,csv")]
    pub formats: Vec<String>,

    /// Bundle all output files into one zip archive
    #[arg(long)]
    pub zip: bool,

    #[arg(long, default_value = "Tournament")]
    pub tournament: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn tournament_name(&self) -> &str {
        &self.tournament
    }

    fn source(&self) -> Result<RegistrantSource> {
        RegistrantSource::infer(&self.source, self.source_type.as_deref())
    }

    fn assigned_file(&self) -> Option<&str> {
        self.assigned.as_deref()
    }

    fn assigned_ids(&self) -> &[String] {
        &self.assigned_ids
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn zip_output(&self) -> Option<&str> {
        self.zip.then_some(DEFAULT_ZIP_NAME)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_source(&self.source()?)?;
        if let Some(assigned) = &self.assigned {
            validation::validate_path("assigned", assigned)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_formats("formats", &self.formats)?;
        validation::validate_non_empty_string("tournament", &self.tournament)
    }
}
