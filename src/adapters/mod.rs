// Adapters layer: concrete implementations for external systems (extraction service, storage).

pub mod oxylabs;
pub mod storage;

pub use oxylabs::OxylabsGateway;
pub use storage::JsonlStore;
