use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use bytes::Bytes;
use crate::network::SessionRequest;
use crate::request::{CallbackResponse, Method};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// 请求完成后的回调，在执行线程上同步调用
pub type Callback = Arc<dyn Fn(CallbackResponse) + Send + Sync>;

/// 单个请求的附加选项
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    pub timeout: Duration,
    pub body: Option<Bytes>,
    pub follow_redirects: bool,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            body: None,
            follow_redirects: true,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 非正数、非有限值或超出 `Duration` 范围的值按默认超时处理
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = if secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(DEFAULT_TIMEOUT)
        } else {
            DEFAULT_TIMEOUT
        };
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json(self, value: &serde_json::Value) -> Self {
        self.body(value.to_string()).header("content-type", "application/json")
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() { DEFAULT_TIMEOUT } else { self.timeout }
    }
}

/// 队列中的待执行请求，入队后不可变
#[derive(Clone)]
pub struct RequestItem {
    id: u64,
    url: String,
    method: Method,
    options: RequestOptions,
    callback: Callback,
}

impl RequestItem {
    pub(crate) fn new(id: u64, url: String, method: Method, options: RequestOptions, callback: Callback) -> Self {
        Self { id, url, method, options, callback }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn timeout(&self) -> Duration {
        self.options.effective_timeout()
    }

    pub(crate) fn callback(&self) -> &Callback {
        &self.callback
    }

    pub(crate) fn to_session_request(&self) -> SessionRequest {
        SessionRequest {
            method: self.method,
            url: self.url.clone(),
            headers: self.options.headers.clone(),
            body: if self.method.carries_body() {
                Some(self.options.body.clone().unwrap_or_default())
            } else {
                None
            },
            follow_redirects: !self.method.honours_redirect_flag() || self.options.follow_redirects,
            timeout: self.timeout(),
        }
    }
}

impl fmt::Debug for RequestItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestItem")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("method", &self.method)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
