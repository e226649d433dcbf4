//! # Domain Models
//!
//! Strongly-typed values that flow through the pipeline. Construction
//! validates every invariant, so a [`PriceSeries`] held anywhere in the crate
//! is already sorted, duplicate-free and made of finite non-negative closes.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Normalized 1-5 letter ticker |
//! | [`TradingDate`] | Calendar date (`YYYY-MM-DD`) |
//! | [`PricePoint`] | Closing price for one date |
//! | [`PriceSeries`] | Ascending, duplicate-free closing prices |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp for envelopes |

mod date;
mod price;
mod symbol;
mod timestamp;

pub use date::TradingDate;
pub use price::{PricePoint, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
