//! HTTP surface
//!
//! - `services`: route handlers and the route table
//! - `middleware`: request logging
//! - `error`: `ShortenerError` to JSON error response mapping

pub mod error;
pub mod middleware;
pub mod services;

pub use error::ErrorBody;
pub use services::{configure, not_found};
