use clap::Parser;
use golf_team_builder::utils::{logger, validation::Validate};
use golf_team_builder::{CliConfig, LocalStorage, SuggestionEngine, SuggestionPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🏌️ Suggesting teams for {}", config.tournament);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        e.report("Invalid command line");
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }
    let monitor_enabled = config.monitor;

    let storage = LocalStorage::new(config.output_path.clone());
    let engine =
        SuggestionEngine::new_with_monitoring(SuggestionPipeline::new(storage, config), monitor_enabled);

    let output_path = match engine.run().await {
        Ok(path) => path,
        Err(e) => {
            e.report("Suggestion run failed");
            std::process::exit(e.exit_code());
        }
    };

    println!("✅ Team suggestions generated");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}
