// src/network/http_version.rs
use std::fmt;
use std::str::FromStr;
use reqwest::ClientBuilder;
use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HttpVersion {
    #[default]
    Auto,                // 自动协商（默认）
    Http1Only,           // 仅使用 HTTP/1.1
    Http2,               // 优先尝试 HTTP/2，可回退到 HTTP/1.1
    Http2PriorKnowledge, // 强制 HTTP/2（无回落）
}

impl HttpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Auto => "AUTO",
            HttpVersion::Http1Only => "HTTP1_ONLY",
            HttpVersion::Http2 => "HTTP2",
            HttpVersion::Http2PriorKnowledge => "HTTP2_PRIOR_KNOWLEDGE",
        }
    }

    pub fn supports_http2(&self) -> bool {
        !matches!(self, HttpVersion::Http1Only)
    }

    pub(crate) fn apply_to_builder(&self, builder: ClientBuilder) -> ClientBuilder {
        match self {
            HttpVersion::Auto | HttpVersion::Http2 => builder,
            HttpVersion::Http1Only => builder.http1_only(),
            HttpVersion::Http2PriorKnowledge => builder.http2_prior_knowledge(),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AUTO" | "" => Ok(HttpVersion::Auto),
            "HTTP1" | "HTTP1.1" | "HTTP1_ONLY" => Ok(HttpVersion::Http1Only),
            "HTTP2" => Ok(HttpVersion::Http2),
            "HTTP2_PRIOR_KNOWLEDGE" | "FORCE_HTTP2" | "HTTP2_ONLY" => Ok(HttpVersion::Http2PriorKnowledge),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid HTTP version: '{}'. Valid values: AUTO, HTTP1_ONLY, HTTP2, HTTP2_PRIOR_KNOWLEDGE",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("".parse::<HttpVersion>().unwrap(), HttpVersion::Auto);
        assert_eq!("http1.1".parse::<HttpVersion>().unwrap(), HttpVersion::Http1Only);
        assert_eq!("force_http2".parse::<HttpVersion>().unwrap(), HttpVersion::Http2PriorKnowledge);
        assert!("http3".parse::<HttpVersion>().is_err());
    }

    #[test]
    fn test_supports_http2() {
        assert!(HttpVersion::Auto.supports_http2());
        assert!(!HttpVersion::Http1Only.supports_http2());
        assert_eq!(HttpVersion::Http2.to_string(), "HTTP2");
    }
}
