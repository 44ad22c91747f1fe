pub mod time;

pub use time::{format_datetime, truncate_body};
