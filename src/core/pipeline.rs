use crate::adapters::{export, registrants};
use crate::core::{ConfigProvider, Pipeline, RegistrantBatch, Storage, SuggestionRun};
use crate::domain::services::{suggest_teams, Roster};
use crate::utils::error::Result;
use chrono::Utc;
use reqwest::Client;
use std::path::Path;

/// Reads registrants from the configured source, suggests teams, writes the export.
pub struct SuggestionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> SuggestionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SuggestionPipeline<S, C> {
    async fn extract(&self) -> Result<RegistrantBatch> {
        let source = self.config.source()?;
        tracing::debug!("Loading registrants from {}", source.describe());
        let golfers = source.fetch(&self.client).await?;

        let mut already_assigned = match self.config.assigned_file() {
            Some(path) => {
                let data = tokio::fs::read(path).await?;
                registrants::parse_assigned_ids(&data)?
            }
            None => Default::default(),
        };
        already_assigned.extend(
            self.config
                .assigned_ids()
                .iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        );

        if golfers.is_empty() {
            tracing::warn!("Registrant source returned no golfers");
        }

        Ok(RegistrantBatch {
            golfers,
            already_assigned,
        })
    }

    async fn transform(&self, batch: RegistrantBatch) -> Result<SuggestionRun> {
        let run = suggest_teams(&batch.golfers, &batch.already_assigned);

        let available = Roster::new(&batch.golfers, &batch.already_assigned).ids();
        run.check_contract(&available)?;

        Ok(run)
    }

    async fn load(&self, run: SuggestionRun) -> Result<String> {
        let files = export::render(
            &run,
            self.config.output_formats(),
            self.config.tournament_name(),
            Utc::now(),
        )?;

        match self.config.zip_output() {
            Some(archive) => {
                tracing::debug!("Creating ZIP file with {} files", files.len());
                let zip_data = export::zip_files(&files)?;
                self.storage.write_file(archive, &zip_data).await?;
                Ok(Path::new(self.config.output_path())
                    .join(archive)
                    .display()
                    .to_string())
            }
            None => {
                for (name, data) in &files {
                    self.storage.write_file(name, data).await?;
                }
                Ok(self.config.output_path().to_string())
            }
        }
    }
}
