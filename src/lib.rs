//! 客户端 HTTP 请求队列：按顺序或并发执行入队的请求，可选在后台线程中运行。

pub mod debug;
pub mod error;
pub mod network;
pub mod queue;
pub mod request;
pub mod runner;
pub mod utils;

pub use debug::{init_logging, set_debug, DebugTarget};
pub use error::{Error, Result};
pub use network::{
    ClientConfig, Connector, HttpVersion, ProxyConfig, ReqwestConnector, Session, SessionRequest,
    SessionResponse,
};
pub use queue::Queue;
pub use request::{
    Callback, CallbackResponse, Method, RequestItem, RequestOptions, Strategy, DEFAULT_TIMEOUT,
};
pub use runner::{ExecutionRunner, WorkerPool};
