// Public modules
pub mod config;
pub mod errors;
pub mod models;
pub mod normalizer;
pub mod nse;
pub mod services;
pub mod session;
pub mod util;

// Re-export the commonly used types
pub use config::SessionConfig;
pub use errors::{NseError, Result};
pub use models::market::{AdvancesDeclines, FutureQuote};
pub use models::response::Response;
pub use normalizer::{normalize, normalize_default};
pub use nse::Nse;
pub use services::bhavcopy::BhavcopyDownloader;
pub use session::{ResponseCache, Session};
