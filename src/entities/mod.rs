pub mod campaign;
pub mod metric;

pub use campaign::{CampaignStatus, Platform};
