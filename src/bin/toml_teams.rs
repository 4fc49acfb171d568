use clap::Parser;
use golf_team_builder::core::{ConfigProvider, Pipeline, RegistrantBatch};
use golf_team_builder::domain::services::{Partition, PreferenceGraph, Roster};
use golf_team_builder::utils::{logger, validation::Validate};
use golf_team_builder::{LocalStorage, SuggestionEngine, SuggestionPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-teams")]
#[command(about = "Suggest tournament teams using a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "teams-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Load registrants and show how they partition, without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Could not read '{}': {}", args.config, e);
            eprintln!("💡 Check that the file exists and is valid TOML");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let level = if args.verbose || config.verbose_logs() {
        "debug"
    } else {
        "info"
    };
    logger::init_logger(level, config.json_logs());

    tracing::info!("🏌️ Suggesting teams for {}", config.tournament.name);
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Err(e) = config.validate() {
        e.report("Invalid configuration");
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SuggestionPipeline::new(storage, config);

    if args.dry_run {
        // 只讀取報名資料，不寫出任何檔案
        let batch = match pipeline.extract().await {
            Ok(batch) => batch,
            Err(e) => {
                e.report("Could not load registrants");
                std::process::exit(e.exit_code().max(1));
            }
        };
        perform_dry_run(&batch);
        return Ok(());
    }

    let engine = SuggestionEngine::new_with_monitoring(pipeline, monitor_enabled);
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Tournament: {}", config.tournament.name);
    if let Some(description) = &config.tournament.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.source.describe());
    if let Some(path) = config.assigned_file() {
        println!("  Assigned ids file: {}", path);
    }
    if !config.assigned_ids().is_empty() {
        println!("  Assigned ids listed: {}", config.assigned_ids().len());
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.zip_output() {
        println!("  Compression: {} (ZIP)", archive);
    }

    if args.dry_run {
        println!("  Mode: dry run, nothing will be written");
    }
    println!();
}

fn perform_dry_run(batch: &RegistrantBatch) {
    let roster = Roster::new(&batch.golfers, &batch.already_assigned);
    let partition = Partition::new(roster.golfers());
    let graph = PreferenceGraph::build(roster.golfers());

    println!("🔍 Registrant overview:");
    println!();
    println!("👥 Registrants:");
    println!("  Loaded: {}", batch.golfers.len());
    println!("  Already on teams: {}", batch.golfers.len() - roster.len());
    println!("  Available: {}", roster.len());

    println!();
    println!("🗂️ Registration Groups:");
    for (group_id, size) in partition.group_sizes() {
        println!("  {}: {} golfers", group_id, size);
    }
    println!("  Ungrouped: {}", partition.ungrouped.len());

    println!();
    println!("🔗 Preference edges: {}", graph.edge_count());
    let with_text = roster
        .golfers()
        .iter()
        .filter(|g| g.preference_text().is_some())
        .count();
    println!("  Golfers with preference text: {}", with_text);

    println!();
    println!("✅ Dry run analysis complete. Run without --dry-run to write suggestions.");
}
