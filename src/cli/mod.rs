//! Terminal rendering of the FX line and the futures table.

pub mod futures;
pub mod rates;
pub mod scrape;
pub mod setup;
pub mod ui;
