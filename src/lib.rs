pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{JsonlStore, OxylabsGateway};
pub use app::{handle_scan, ScanResponse};
pub use config::ScoutConfig;
pub use crate::core::{
    scanner::{ScanSettings, TenderScanner},
    scheduler::{ScanScheduler, SchedulerSettings, SchedulerState},
    selector::{FixedSelector, RandomSelector},
};
pub use domain::model::{Opportunity, ScanRequest, ScannedOpportunity};
pub use utils::error::{Result, ScoutError};
