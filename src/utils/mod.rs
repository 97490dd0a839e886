pub mod duration;
pub mod url_validator;

pub use duration::{format_duration, parse_duration};
pub use url_validator::validate_url;
