use std::collections::HashMap;
use futures::future::BoxFuture;
use reqwest::redirect::Policy;
use reqwest::Client;
use crate::error::Result;
use crate::network::transport::{Connector, Session, SessionRequest, SessionResponse};
use crate::network::{HttpVersion, ProxyConfig};

pub const DEFAULT_USER_AGENT: &str = concat!("rusty-req-queue/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_BACKGROUND_WORKERS: usize = 4;

/// HTTP 客户端配置
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub user_agent: String,
    pub http_version: HttpVersion,
    pub proxy: Option<ProxyConfig>,
    pub gzip: bool,
    pub brotli: bool,
    pub deflate: bool,
    /// 全局后台线程池的线程数
    pub background_workers: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_version: HttpVersion::Auto,
            proxy: None,
            gzip: true,
            brotli: true,
            deflate: true,
            background_workers: DEFAULT_BACKGROUND_WORKERS,
        }
    }
}

impl ClientConfig {
    /// 从环境变量读取配置，无法解析的值保持默认
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RUSTY_REQ_USER_AGENT") {
            if !val.is_empty() {
                config.user_agent = val;
            }
        }

        if let Ok(val) = std::env::var("RUSTY_REQ_HTTP_VERSION") {
            match val.parse() {
                Ok(version) => config.http_version = version,
                Err(e) => tracing::warn!("ignoring RUSTY_REQ_HTTP_VERSION: {}", e),
            }
        }

        if let Ok(val) = std::env::var("RUSTY_REQ_PROXY") {
            if !val.is_empty() {
                config.proxy = Some(ProxyConfig::from_url(val));
            }
        }

        if let Ok(val) = std::env::var("RUSTY_REQ_WORKERS") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.background_workers = n,
                _ => tracing::warn!("ignoring RUSTY_REQ_WORKERS={:?}", val),
            }
        }

        config
    }

    pub(crate) fn build_client(&self, follow_redirects: bool) -> Result<Client> {
        let mut builder = Client::builder()
            .gzip(self.gzip)
            .brotli(self.brotli)
            .deflate(self.deflate)
            .user_agent(self.user_agent.as_str());

        builder = self.http_version.apply_to_builder(builder);

        if let Some(proxy) = &self.proxy {
            builder = proxy.apply_to_builder(builder)?;
        }

        if !follow_redirects {
            builder = builder.redirect(Policy::none());
        }

        Ok(builder.build()?)
    }
}

/// 基于 reqwest 的默认连接器
#[derive(Clone, Debug, Default)]
pub struct ReqwestConnector {
    config: ClientConfig,
}

impl ReqwestConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Connector for ReqwestConnector {
    fn open_session(&self) -> Result<Box<dyn Session>> {
        // reqwest 的重定向策略是客户端级别的，所以一个会话持有两个客户端
        Ok(Box::new(ReqwestSession {
            client: self.config.build_client(true)?,
            no_redirect: self.config.build_client(false)?,
        }))
    }
}

struct ReqwestSession {
    client: Client,
    no_redirect: Client,
}

impl Session for ReqwestSession {
    fn send(&self, request: SessionRequest) -> BoxFuture<'_, Result<SessionResponse>> {
        Box::pin(async move {
            let client = if request.follow_redirects { &self.client } else { &self.no_redirect };

            let mut builder = client
                .request(request.method.to_reqwest(), &request.url)
                .timeout(request.timeout);

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let res = builder.send().await?;
            let status = res.status().as_u16();
            let headers: HashMap<String, String> = res.headers().iter()
                .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
                .collect();
            let body = res.bytes().await?;

            Ok(SessionResponse { method: request.method, status, headers, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ClientConfig::default();
        assert!(cfg.user_agent.starts_with("rusty-req-queue/"));
        assert_eq!(cfg.http_version, HttpVersion::Auto);
        assert_eq!(cfg.background_workers, DEFAULT_BACKGROUND_WORKERS);
        assert!(cfg.proxy.is_none());
    }

    #[test]
    fn test_open_session_with_default_config() {
        let connector = ReqwestConnector::default();
        assert!(connector.open_session().is_ok());
    }

    #[test]
    fn test_open_session_rejects_bad_proxy() {
        let config = ClientConfig {
            proxy: Some(ProxyConfig::from_url("::not a proxy::").with_auth("u", None)),
            ..Default::default()
        };
        assert!(ReqwestConnector::new(config).open_session().is_err());
    }
}
