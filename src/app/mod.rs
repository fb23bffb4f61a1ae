pub mod scan_api;

pub use scan_api::{handle_scan, ScanResponse};
