//! Domain types, coercion helpers and configuration

pub mod commodity;
pub mod config;
pub mod locale;
pub mod log;
pub mod numeric;
pub mod quote;

// Re-export main types for cleaner imports
pub use commodity::{Commodity, TrackedContract, TRACKED_CONTRACTS};
pub use locale::Locale;
pub use quote::{
    DataSource, FuturesDataResult, FuturesQuote, QuoteProvider, RateProvider, RateQuote,
    RateSheet,
};
