//! Tibber API integration for dynamic electricity pricing
//!
//! Fetches the current price marker and the hourly prices for today and
//! tomorrow through Tibber's GraphQL API.

pub mod client;
pub mod types;

pub use client::{PRICE_INFO_QUERY, TibberClient, decode_price_timeline};
