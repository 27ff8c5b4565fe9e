//! REST API Adapters - Price Feeds and Tron Explorer
//!
//! Plain `GET → JSON` integrations with third-party HTTP APIs.
//!
//! Sub-modules:
//! - `client`: reqwest client implementing the `JsonFetcher` port
//! - `price`: DexScreener / Tronscan USD price lookup
//! - `types`: response payload definitions

pub mod client;
pub mod price;
pub mod types;

pub use client::{HttpClientConfig, HttpJsonClient};
pub use price::PriceOracle;
