use crate::config::TrackerSettings;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "seat-tracker")]
#[command(about = "Watch a class section for open seats and send a push notification")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Check once and exit instead of polling
    #[arg(long)]
    pub once: bool,

    /// Class number to watch
    #[arg(long = "class")]
    pub class_number: Option<String>,

    /// Catalog search URL
    #[arg(long)]
    pub url: Option<String>,

    /// Authorization token (falls back to ASU_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Seconds between checks
    #[arg(long)]
    pub interval: Option<u64>,

    #[arg(long)]
    pub ntfy_topic: Option<String>,

    #[arg(long)]
    pub ntfy_url: Option<String>,

    /// Optional webhook (falls back to SEAT_TRACKER_WEBHOOK_URL)
    #[arg(long)]
    pub webhook_url: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 參數錯誤一律 exit 1；`--help` 走 stdout，exit 0
    pub fn exit_code_for(err: &clap::Error) -> i32 {
        if err.use_stderr() {
            1
        } else {
            0
        }
    }

    /// 設定檔 → 環境變數 → 命令列，依序覆蓋
    pub fn resolve(&self) -> Result<TrackerSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TrackerSettings::from_file(path)?
            }
            None => TrackerSettings::default(),
        };

        settings.apply_environment();
        self.apply_overrides(&mut settings);

        Ok(settings)
    }

    pub fn apply_overrides(&self, settings: &mut TrackerSettings) {
        if let Some(class_number) = &self.class_number {
            settings.catalog.class_number = class_number.clone();
        }
        if let Some(url) = &self.url {
            settings.catalog.url = url.clone();
        }
        if let Some(token) = &self.token {
            settings.catalog.token = Some(token.clone());
        }
        if let Some(interval) = self.interval {
            settings.poll.interval_secs = interval;
        }
        if let Some(topic) = &self.ntfy_topic {
            settings.notify.ntfy_topic = topic.clone();
        }
        if let Some(ntfy_url) = &self.ntfy_url {
            settings.notify.ntfy_url = ntfy_url.clone();
        }
        if let Some(webhook) = &self.webhook_url {
            settings.notify.webhook_url = Some(webhook.clone());
        }
        if self.once {
            settings.poll.run_once = true;
        }
    }
}
