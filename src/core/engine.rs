use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives one suggestion run: extract registrants, form teams, write output.
pub struct SuggestionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SuggestionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting team suggestion run...");

        // Extract
        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} registrants ({} already on teams)",
            batch.golfers.len(),
            batch.already_assigned.len()
        );
        self.monitor.log_phase("Extract");

        // Transform
        let run = self.pipeline.transform(batch).await?;
        tracing::info!(
            "Suggested {} teams covering {} golfers, {} unassigned",
            run.suggested_teams.len(),
            run.assigned_count(),
            run.unassigned.len()
        );
        self.monitor.log_phase("Transform");

        // Load
        let output_path = self.pipeline.load(run).await?;
        tracing::info!("Suggestions saved to: {}", output_path);
        self.monitor.log_phase("Load");
        self.monitor.log_final();

        Ok(output_path)
    }
}
