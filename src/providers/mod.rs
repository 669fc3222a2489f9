pub mod barchart;
pub mod ecb;
pub mod futures_data;
pub mod snapshot;
pub mod util;

pub use barchart::BarchartQuoteProvider;
pub use ecb::EcbRateProvider;
pub use futures_data::FuturesDataService;
pub use snapshot::SnapshotReader;
