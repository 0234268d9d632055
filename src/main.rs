use clap::Parser;
use seat_tracker::config::is_ci_environment;
use seat_tracker::utils::{logger, validation::Validate};
use seat_tracker::{CheckOutcome, CliConfig, SeatTracker};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = match CliConfig::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(CliConfig::exit_code_for(&e));
        }
    };

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證設定
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "🚀 Starting tracker for Class {}",
        settings.catalog.class_number
    );
    tracing::info!(
        "📣 Notifications will be sent to: {}",
        settings.notify.topic_url()
    );
    if is_ci_environment() {
        tracing::info!("Running in GitHub Actions mode (single check)");
    }
    if settings.notify.webhook_url.is_some() {
        tracing::info!("📣 Webhook notifications enabled");
    }
    if settings.catalog.token.is_none() {
        tracing::debug!("No token configured, sending unauthenticated requests");
    }

    let tracker = SeatTracker::from_settings(&settings);

    match tracker.run().await {
        CheckOutcome::SeatsOpen { seats } => {
            tracing::info!("✅ Task complete: {} seat(s) open", seats);
        }
        outcome => {
            tracing::info!("Single check finished: {:?}", outcome);
        }
    }

    Ok(())
}
