//! 传输层接口：一个批次内所有请求共享同一个 [`Session`]。

use std::collections::HashMap;
use std::time::Duration;
use bytes::Bytes;
use futures::future::BoxFuture;
use crate::error::Result;
use crate::request::Method;

/// 交给传输层的单个请求
#[derive(Clone, Debug)]
pub struct SessionRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
    pub follow_redirects: bool,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SessionResponse {
    /// 实际生效的请求方法
    pub method: Method,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

/// 连接管理会话，返回时须已读完完整响应体
pub trait Session: Send + Sync {
    fn send(&self, request: SessionRequest) -> BoxFuture<'_, Result<SessionResponse>>;
}

/// 每个批次打开一个会话，批次结束时 drop 即关闭
pub trait Connector: Send + Sync + 'static {
    fn open_session(&self) -> Result<Box<dyn Session>>;
}
