pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::TrackerSettings;
pub use crate::core::{
    catalog::CatalogClient,
    notifier::{NotifierSet, NtfyNotifier, WebhookNotifier},
    tracker::SeatTracker,
};
pub use crate::domain::model::{CheckOutcome, ClassSection, Notification, SeatCount};
pub use crate::utils::error::{Result, TrackerError};
