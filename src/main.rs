use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tender_scout::config::Command;
use tender_scout::domain::ports::OpportunityStore;
use tender_scout::utils::error::ErrorSeverity;
use tender_scout::utils::{logger, validation::Validate};
use tender_scout::{
    handle_scan, CliConfig, JsonlStore, OxylabsGateway, RandomSelector, ScanRequest,
    ScanScheduler, ScoutConfig, ScoutError, TenderScanner,
};

fn exit_with(e: &ScoutError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

fn load_config(cli: &CliConfig) -> Result<ScoutConfig, ScoutError> {
    let mut config = if Path::new(&cli.config).exists() {
        tracing::info!("📁 Loading configuration from: {}", cli.config);
        ScoutConfig::from_file(&cli.config)?
    } else {
        tracing::info!("📁 {} not found, using default configuration", cli.config);
        ScoutConfig::default()
    };

    if let Some(api_key) = &cli.api_key {
        config.extraction.api_key = Some(api_key.clone());
    }

    config.validate()?;
    Ok(config)
}

fn build_scanner(config: &ScoutConfig) -> TenderScanner<OxylabsGateway, RandomSelector> {
    let gateway = match OxylabsGateway::from_config(&config.extraction) {
        Ok(gateway) => Some(gateway),
        Err(e) => {
            tracing::warn!("⚠️ {}. Crawler will fail if used.", e);
            None
        }
    };
    TenderScanner::new(gateway, RandomSelector, config.scan_settings())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.command {
        Command::Schedule { .. } => logger::init_json_logger(),
        _ => logger::init_cli_logger(cli.verbose),
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    match cli.command {
        Command::Scan { sector, location } => {
            let scanner = build_scanner(&config);
            let response = handle_scan(&scanner, ScanRequest::new(sector, location)).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.success {
                std::process::exit(1);
            }
        }
        Command::Schedule { run_now } => {
            let scanner = Arc::new(build_scanner(&config));
            let store = Arc::new(JsonlStore::new(&config.storage.path));
            let mut settings = match config.scheduler_settings() {
                Ok(settings) => settings,
                Err(e) => exit_with(&e),
            };
            settings.run_on_startup |= run_now;

            tracing::info!(
                "🚀 Scheduler started: daily at {}, {} sectors, {}s between sectors",
                settings.daily_at.format("%H:%M"),
                settings.sectors.len(),
                settings.sector_delay.as_secs()
            );
            let handle = ScanScheduler::new(scanner, store, settings).spawn();

            tokio::select! {
                joined = handle => joined?,
                _ = tokio::signal::ctrl_c() => tracing::info!("👋 Shutting down scheduler"),
            }
        }
        Command::List => {
            let store = JsonlStore::new(&config.storage.path);
            let records = store.read_all().await;
            tracing::info!("📦 {} stored opportunities", records.len());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
