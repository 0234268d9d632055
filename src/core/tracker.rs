use crate::config::TrackerSettings;
use crate::core::catalog::CatalogClient;
use crate::core::notifier::NotifierSet;
use crate::domain::model::{CheckOutcome, Notification};
use crate::domain::ports::CatalogSource;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 輪詢迴圈：fetch → 比對 → 通知 → sleep
pub struct SeatTracker<C: CatalogSource> {
    catalog: C,
    notifiers: NotifierSet,
    class_number: String,
    title: String,
    priority: String,
    tags: Vec<String>,
    interval: Duration,
    run_once: bool,
    /// 這次 401 是否已推播過；拿到正常回應後重置
    auth_alert_sent: AtomicBool,
}

impl SeatTracker<CatalogClient> {
    pub fn from_settings(settings: &TrackerSettings) -> Self {
        let client = Client::new();
        let catalog = CatalogClient::with_client(client.clone(), settings.catalog.clone());
        let notifiers = NotifierSet::from_settings(client, &settings.notify);
        tracing::debug!("{} notification channel(s) configured", notifiers.len());

        Self::new(catalog, notifiers, settings)
    }
}

impl<C: CatalogSource> SeatTracker<C> {
    pub fn new(catalog: C, notifiers: NotifierSet, settings: &TrackerSettings) -> Self {
        Self {
            catalog,
            notifiers,
            class_number: settings.catalog.class_number.clone(),
            title: settings.notify.title.clone(),
            priority: settings.notify.priority.clone(),
            tags: settings.notify.tags.clone(),
            interval: settings.poll.interval(),
            run_once: settings.poll.run_once,
            auth_alert_sent: AtomicBool::new(false),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// 檢查一次。所有錯誤在這裡吃掉，只回傳結果
    pub async fn check_once(&self) -> CheckOutcome {
        tracing::info!("🔍 Checking for Class #{}...", self.class_number);

        let section = match self.catalog.find_section(&self.class_number).await {
            Ok(section) => {
                self.auth_alert_sent.store(false, Ordering::Relaxed);
                section
            }
            Err(e) => {
                if e.is_auth_failure() {
                    tracing::warn!("🔑 Catalog returned 401: {}", e.recovery_suggestion());
                    self.alert_token_rejected().await;
                } else {
                    tracing::error!("❌ Check failed: {}", e);
                }
                return CheckOutcome::Failed;
            }
        };

        let Some(section) = section else {
            tracing::warn!(
                "⚠️ Class {} not found in search results.",
                self.class_number
            );
            return CheckOutcome::NotFound;
        };

        tracing::debug!(
            "Class {}: cap {}, enrolled {}",
            section.class_number,
            section.enrollment_cap,
            section.enrollment_total
        );

        if !section.has_open_seats() {
            tracing::info!("Class {} is still full.", self.class_number);
            return CheckOutcome::Full;
        }

        let seats = section.seats_available;
        let notification = Notification::seats_open(&self.title, &self.class_number, seats)
            .with_priority(self.priority.clone())
            .with_tags(self.tags.clone());
        tracing::info!("🎉 {}", notification.message);

        let delivered = self.notifiers.notify_all(&notification).await;
        if delivered == 0 && !self.notifiers.is_empty() {
            tracing::warn!("⚠️ Seats are open but no notification could be delivered");
        }

        CheckOutcome::SeatsOpen { seats }
    }

    /// 連續的 401 只推播第一次
    async fn alert_token_rejected(&self) {
        if self.auth_alert_sent.swap(true, Ordering::Relaxed) {
            return;
        }
        let notification = Notification::token_rejected(&self.title, &self.class_number);
        self.notifiers.notify_all(&notification).await;
    }

    /// 單次模式只檢查一次；否則一直輪詢到有空位為止
    pub async fn run(&self) -> CheckOutcome {
        if self.run_once {
            tracing::info!("Running in single-check mode");
            return self.check_once().await;
        }

        let mut checks: u64 = 0;
        loop {
            checks += 1;
            let outcome = self.check_once().await;
            if outcome.is_found() {
                tracing::info!("✅ Seat found after {} check(s). Happy registering!", checks);
                return outcome;
            }

            tracing::debug!("Sleeping {:?} before next check", self.interval);
            tokio::time::sleep(self.interval).await;
        }
    }
}
