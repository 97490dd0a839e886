//! Shortener - a URL shortener with sliding expiry
//!
//! Long URLs are stored under short codes in a key-value store with a TTL.
//! Every resolution resets the TTL, so links that keep being used stay alive
//! while forgotten ones expire on their own.
//!
//! # Architecture
//! - `services`: shortening, resolution and expiry reporting
//! - `storage`: key-value backends (Redis, in-memory)
//! - `api`: HTTP handlers, routes and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and the server mode
//! - `system`: Logging and signal handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
