//! Utility functions for SmartLink Core
//!
//! Small, dependency-light helpers shared by the models and services.

mod html;
mod time;
mod url;

pub use html::strip_tags;
pub use time::{format_relative, Clock, FixedClock, SystemClock};
pub use url::is_url;
