use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;
use bytes::Bytes;
use chrono::{DateTime, Local};
use crate::request::Method;

/// 传给回调的规范化响应
#[derive(Clone, Debug)]
pub struct CallbackResponse {
    pub url: String,
    pub method: Method,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    pub requested_at: DateTime<Local>,
    pub elapsed: Duration,
}

impl CallbackResponse {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 按不区分大小写的方式查找响应头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
