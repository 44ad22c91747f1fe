// src/network/mod.rs
pub mod client;
pub mod http_version;
pub mod proxy_config;
pub mod transport;

// 重新导出，方便外部使用
pub use client::{ClientConfig, ReqwestConnector};
pub use http_version::HttpVersion;
pub use proxy_config::ProxyConfig;
pub use transport::{Connector, Session, SessionRequest, SessionResponse};
