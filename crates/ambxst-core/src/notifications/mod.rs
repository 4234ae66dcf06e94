//! Text helpers for rendering desktop notifications.

mod body;
mod time;

pub use body::{clean_notification_body, CHROMIUM_BROWSERS};
pub use time::{format_relative_time, relative_time_between};
