use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Url parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {seconds:.2} seconds: {url}")]
    Timeout { url: String, seconds: f64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    /// 执行上下文或后台线程池已关闭
    #[error("Execution context already shut down")]
    ShutDown,

    #[error("Batch panicked: {0}")]
    BatchPanicked(String),

    #[error("Callback panicked: {0}")]
    CallbackPanicked(String),
}

impl Error {
    /// 关闭竞争属于正常退出路径，不记录日志
    pub fn is_benign(&self) -> bool {
        matches!(self, Error::ShutDown)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
