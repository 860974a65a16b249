// Adapters layer: concrete implementations of the domain ports (stores, data layers).

pub mod fixture_store;
pub mod http_data_layer;
pub mod memory_data_layer;

pub use fixture_store::FixtureStore;
pub use http_data_layer::HttpDataLayer;
pub use memory_data_layer::RecordingDataLayer;
