use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;
use crate::error::{Error, Result};
use crate::network::SessionResponse;
use crate::utils::{format_datetime, truncate_body};

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

const BODY_PREVIEW: usize = 512;

#[derive(Clone, Debug, PartialEq)]
pub enum DebugTarget {
    Console,
    File(PathBuf),
}

impl DebugTarget {
    /// "console" 或空串输出到控制台，目录写入 `<dir>/debug.log`
    pub fn parse(target: Option<&str>) -> Self {
        match target {
            None => DebugTarget::Console,
            Some(t) if t.is_empty() || t.eq_ignore_ascii_case("console") => DebugTarget::Console,
            Some(t) => {
                let path = Path::new(t);
                if path.is_dir() { DebugTarget::File(path.join("debug.log")) } else { DebugTarget::File(path.to_path_buf()) }
            }
        }
    }
}

/// 打开或关闭每个响应的调试输出
pub fn set_debug(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_debug() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// 安装全局 fmt subscriber，`RUST_LOG` 未设置时默认 `rusty_req_queue=debug`
pub fn init_logging(target: DebugTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "rusty_req_queue=debug".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match target {
        DebugTarget::Console => builder.try_init(),
        DebugTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    installed.map_err(|e| Error::InvalidConfig(format!("logging already initialised: {}", e)))
}

pub(crate) fn debug_log(id: u64, url: &str, requested_at: DateTime<Local>, response: &SessionResponse) {
    if !is_debug() {
        return;
    }

    let mut headers: Vec<_> = response.headers.iter().collect();
    headers.sort();
    tracing::debug!(
        target: "rusty_req_queue::debug",
        id,
        method = %response.method,
        url,
        requested_at = %format_datetime(requested_at),
        status = response.status,
        headers = ?headers,
        body = %truncate_body(&response.body, BODY_PREVIEW),
        "response received"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(DebugTarget::parse(None), DebugTarget::Console);
        assert_eq!(DebugTarget::parse(Some("")), DebugTarget::Console);
        assert_eq!(DebugTarget::parse(Some("CONSOLE")), DebugTarget::Console);

        let dir = std::env::temp_dir();
        assert_eq!(
            DebugTarget::parse(dir.to_str()),
            DebugTarget::File(dir.join("debug.log"))
        );
        assert_eq!(
            DebugTarget::parse(Some("/no/such/dir/req.log")),
            DebugTarget::File(PathBuf::from("/no/such/dir/req.log"))
        );
    }

    #[test]
    fn test_toggle_debug() {
        set_debug(true);
        assert!(is_debug());
        set_debug(false);
        assert!(!is_debug());
    }
}
