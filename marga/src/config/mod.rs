//! Unified configuration loading for marga.
//!
//! Loads all configuration from a single YAML file.

mod defaults;
mod error;
mod open_search;
mod search;
mod simplify;
mod trace;

// Re-export main types
pub use error::ConfigLoadError;
pub use trace::TraceConfig;

// Re-export section types
pub use open_search::OpenSearchSection;
pub use search::SearchSection;
pub use simplify::SimplifySection;
