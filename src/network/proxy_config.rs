use reqwest::{ClientBuilder, Proxy};
use url::Url;
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `Some(false)` 时忽略 HTTP(S)_PROXY 等环境变量
    pub trust_env: Option<bool>,
}

impl ProxyConfig {
    pub fn from_url(proxy_url: impl Into<String>) -> Self {
        Self { all: Some(proxy_url.into()), ..Default::default() }
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.username = Some(username.into());
        self.password = password;
        self
    }

    pub fn trust_env(mut self, trust: bool) -> Self {
        self.trust_env = Some(trust);
        self
    }

    fn has_proxy(&self) -> bool {
        self.all.is_some() || self.http.is_some() || self.https.is_some()
    }

    // 把用户名密码写进代理地址
    fn with_credentials(&self, proxy_url: &str) -> Result<String> {
        if self.username.is_none() {
            return Ok(proxy_url.to_string());
        }
        let mut parsed = Url::parse(proxy_url)?;
        if let Some(user) = &self.username {
            let _ = parsed.set_username(user);
        }
        if let Some(pass) = &self.password {
            let _ = parsed.set_password(Some(pass));
        }
        Ok(parsed.to_string())
    }

    pub(crate) fn apply_to_builder(&self, mut builder: ClientBuilder) -> Result<ClientBuilder> {
        if let Some(all) = &self.all {
            builder = builder.proxy(Proxy::all(self.with_credentials(all)?)?);
        } else {
            if let Some(http) = &self.http {
                builder = builder.proxy(Proxy::http(self.with_credentials(http)?)?);
            }
            if let Some(https) = &self.https {
                builder = builder.proxy(Proxy::https(self.with_credentials(https)?)?);
            }
        }

        if self.trust_env == Some(false) && !self.has_proxy() {
            builder = builder.no_proxy();
        }
        Ok(builder)
    }
}
