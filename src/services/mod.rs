//! Service layer for business logic
//!
//! The HTTP handlers are thin wrappers around `ShortenerService`; everything
//! that decides how a mapping is created, resolved or inspected lives here.

pub mod code;
pub mod domain;
mod shortener_service;

pub use code::{GENERATED_CODE_LEN, generate_code};
pub use domain::is_self_reference;
pub use shortener_service::*;
