use crate::domain::model::{ClassSection, Notification};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 課程資料來源。`Ok(None)` 表示搜尋結果裡沒有這個 section。
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn find_section(&self, class_number: &str) -> Result<Option<ClassSection>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &str;
    async fn send(&self, notification: &Notification) -> Result<()>;
}
