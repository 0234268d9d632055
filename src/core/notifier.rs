use crate::config::NotifySettings;
use crate::domain::model::Notification;
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;

/// 透過 ntfy relay 推播，body 是純文字訊息
pub struct NtfyNotifier {
    client: Client,
    topic_url: String,
}

impl NtfyNotifier {
    pub fn new(client: Client, topic_url: impl Into<String>) -> Self {
        Self {
            client,
            topic_url: topic_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    fn channel(&self) -> &str {
        "ntfy"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&self.topic_url)
            .header("Title", &notification.title)
            .header("Priority", &notification.priority)
            .header("Tags", notification.tags.join(","))
            .body(notification.message.clone().into_bytes())
            .send()
            .await?;

        ensure_delivered(self.channel(), response.status())
    }
}

/// Discord / Slack 相容的 webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn channel(&self) -> &str {
        "webhook"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let payload = serde_json::json!({
            "content": format!("{}: {}", notification.title, notification.message),
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;

        ensure_delivered(self.channel(), response.status())
    }
}

fn ensure_delivered(channel: &str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TrackerError::NotificationError {
            channel: channel.to_string(),
            message: format!("relay responded with status {}", status),
        })
    }
}

/// 依序送到每個 channel；單一 channel 失敗只記 log
#[derive(Default)]
pub struct NotifierSet {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(client: Client, settings: &NotifySettings) -> Self {
        let mut set = Self::new();
        set.register(Box::new(NtfyNotifier::new(
            client.clone(),
            settings.topic_url(),
        )));
        if let Some(url) = &settings.webhook_url {
            set.register(Box::new(WebhookNotifier::new(client, url.clone())));
        }
        set
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// 回傳成功送出的 channel 數
    pub async fn notify_all(&self, notification: &Notification) -> usize {
        let mut delivered = 0;
        for notifier in &self.notifiers {
            match notifier.send(notification).await {
                Ok(()) => {
                    tracing::info!("📣 Notification sent via {}", notifier.channel());
                    delivered += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Failed to send notification via {}: {}",
                        notifier.channel(),
                        e
                    );
                }
            }
        }
        delivered
    }
}
