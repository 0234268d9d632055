#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://eadvs-cscc-catalog-api.apps.asu.edu/catalog-microservices/api/v1/search/classes?&refine=Y&campusOrOnlineSelection=C&catalogNbr=486&honors=F&promod=F&searchType=all&subject=CSE&term=2261";
pub const DEFAULT_CLASS_NUMBER: &str = "28482";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";
pub const DEFAULT_NTFY_URL: &str = "https://ntfy.sh";
pub const DEFAULT_NTFY_TOPIC: &str = "asu_cse486_alerts";
pub const DEFAULT_INTERVAL_SECS: u64 = 90;

pub const TOKEN_ENV: &str = "ASU_TOKEN";
pub const WEBHOOK_ENV: &str = "SEAT_TRACKER_WEBHOOK_URL";
pub const CI_ENV: &str = "GITHUB_ACTIONS";

/// 最終生效的設定：預設值 < TOML < 環境變數 < CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub catalog: CatalogSettings,
    pub notify: NotifySettings,
    pub poll: PollSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub url: String,
    pub class_number: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
    pub parameters: BTreeMap<String, String>,
    pub fields: FieldPaths,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            class_number: DEFAULT_CLASS_NUMBER.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            parameters: BTreeMap::new(),
            fields: FieldPaths::default(),
        }
    }
}

/// 以點分隔的 JSON key path，例如 `seatInfo.ENRL_CAP`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPaths {
    pub classes: String,
    pub class_number: String,
    pub enrollment_cap: String,
    pub enrollment_total: String,
    /// 有設定時直接讀座位數，不做 cap - total
    pub seats_available: Option<String>,
}

impl Default for FieldPaths {
    fn default() -> Self {
        Self {
            classes: "classes".to_string(),
            class_number: "CLAS.CLASSNBR".to_string(),
            enrollment_cap: "seatInfo.ENRL_CAP".to_string(),
            enrollment_total: "seatInfo.ENRL_TOT".to_string(),
            seats_available: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub ntfy_url: String,
    pub ntfy_topic: String,
    pub title: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub webhook_url: Option<String>,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            ntfy_url: DEFAULT_NTFY_URL.to_string(),
            ntfy_topic: DEFAULT_NTFY_TOPIC.to_string(),
            title: "Class Seat Alert".to_string(),
            priority: "high".to_string(),
            tags: vec!["mortar_board".to_string(), "rotating_light".to_string()],
            webhook_url: None,
        }
    }
}

impl NotifySettings {
    pub fn topic_url(&self) -> String {
        format!("{}/{}", self.ntfy_url.trim_end_matches('/'), self.ntfy_topic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub interval_secs: u64,
    pub run_once: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            run_once: false,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl TrackerSettings {
    pub fn apply_environment(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// 套用環境變數；lookup 可替換以便測試
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.catalog.token = Some(token);
        }

        if let Some(webhook) = lookup(WEBHOOK_ENV).filter(|w| !w.trim().is_empty()) {
            self.notify.webhook_url = Some(webhook);
        }

        // CI 由 cron 排程，每次只檢查一次
        if lookup(CI_ENV).as_deref() == Some("true") {
            tracing::debug!("{}=true detected, switching to single-check mode", CI_ENV);
            self.poll.run_once = true;
        }
    }
}

pub fn is_ci_environment() -> bool {
    std::env::var(CI_ENV).map(|v| v == "true").unwrap_or(false)
}

impl Validate for TrackerSettings {
    fn validate(&self) -> Result<()> {
        validate_url("catalog.url", &self.catalog.url)?;
        validate_non_empty_string("catalog.class_number", &self.catalog.class_number)?;
        validate_non_empty_string("catalog.fields.classes", &self.catalog.fields.classes)?;
        validate_non_empty_string(
            "catalog.fields.class_number",
            &self.catalog.fields.class_number,
        )?;

        if let Some(timeout) = self.catalog.timeout_secs {
            validate_range("catalog.timeout_secs", timeout, 1, 300)?;
        }

        validate_url("notify.ntfy_url", &self.notify.ntfy_url)?;
        validate_non_empty_string("notify.ntfy_topic", &self.notify.ntfy_topic)?;
        if let Some(webhook) = &self.notify.webhook_url {
            validate_url("notify.webhook_url", webhook)?;
        }

        validate_positive_number("poll.interval_secs", self.poll.interval_secs, 1)?;

        Ok(())
    }
}
