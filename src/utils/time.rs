use std::borrow::Cow;
use chrono::{DateTime, Local};

pub fn format_datetime(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 截断响应体用于日志显示
pub fn truncate_body(body: &[u8], max_len: usize) -> Cow<'_, str> {
    if body.len() > max_len {
        Cow::Owned(format!("{}... ({} bytes)", String::from_utf8_lossy(&body[..max_len]), body.len()))
    } else {
        String::from_utf8_lossy(body)
    }
}
