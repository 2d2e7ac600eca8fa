/// Event record storage and retrieval operations.
pub mod event_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer shared by all backends.
pub mod storage;
