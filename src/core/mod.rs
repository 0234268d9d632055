pub mod catalog;
pub mod notifier;
pub mod tracker;

pub use crate::domain::model::{CheckOutcome, ClassSection, Notification, SeatCount};
pub use crate::domain::ports::{CatalogSource, Notifier};
pub use crate::utils::error::Result;
