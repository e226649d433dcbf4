//! # Quotegate Web
//!
//! HTTP boundary for the quotegate stock-data proxy. Handlers translate
//! [`quotegate_core::StockPipeline`] outcomes into JSON envelopes and status
//! codes.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cli`] | Server flags and environment fallbacks |
//! | [`envelope`] | Success and error JSON bodies |
//! | [`error`] | Handler and startup errors |
//! | [`routes`] | Router and handlers |

pub mod cli;
pub mod envelope;
pub mod error;
pub mod routes;

pub use cli::ServerArgs;
pub use envelope::{Envelope, ErrorEnvelope, StockData};
pub use error::{ApiError, ServerError};
pub use routes::{router, AppState};
