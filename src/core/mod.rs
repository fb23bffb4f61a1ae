pub mod fallback;
pub mod normalizer;
pub mod registry;
pub mod scanner;
pub mod scheduler;
pub mod selector;

pub use crate::domain::model::{Opportunity, ScanRequest, ScannedOpportunity};
pub use crate::domain::ports::{ExtractionGateway, OpportunityStore, SourceSelector};
pub use crate::utils::error::Result;
