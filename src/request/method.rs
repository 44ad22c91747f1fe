use std::fmt;
use std::str::FromStr;
use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
        }
    }

    /// POST / PUT / PATCH 发送请求体
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }

    /// 只有 GET / OPTIONS / HEAD 使用 follow_redirects，其余方法总是跟随
    pub fn honours_redirect_flag(&self) -> bool {
        matches!(self, Method::Get | Method::Options | Method::Head)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            "HEAD" => Ok(Method::Head),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!(" Patch ".parse::<Method>().unwrap(), Method::Patch);
        assert!(matches!("FETCH".parse::<Method>(), Err(Error::InvalidMethod(m)) if m == "FETCH"));
        assert!("".parse::<Method>().is_err());
    }

    #[test]
    fn test_verb_classes() {
        let with_body: Vec<_> = [Method::Get, Method::Post, Method::Put, Method::Delete,
            Method::Patch, Method::Options, Method::Head]
            .into_iter()
            .filter(Method::carries_body)
            .collect();
        assert_eq!(with_body, vec![Method::Post, Method::Put, Method::Patch]);

        assert!(Method::Head.honours_redirect_flag());
        assert!(!Method::Delete.honours_redirect_flag());
        assert!(!Method::Post.honours_redirect_flag());
    }
}
