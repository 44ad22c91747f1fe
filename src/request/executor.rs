use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use chrono::Local;
use crate::debug::debug_log;
use crate::error::{panic_message, Error, Result};
use crate::network::Session;
use crate::request::{CallbackResponse, RequestItem};

/// 执行单个请求并同步调用回调，错误原样返回
pub async fn execute_item(session: &dyn Session, item: &RequestItem) -> Result<()> {
    let requested_at = Local::now();
    let start = Instant::now();
    let timeout = item.timeout();

    // 传输层自己也会应用超时，这里再兜一层，防止实现忽略它
    let response = match tokio::time::timeout(timeout, session.send(item.to_session_request())).await {
        Ok(res) => res?,
        Err(_) => {
            return Err(Error::Timeout { url: item.url().to_string(), seconds: timeout.as_secs_f64() });
        }
    };

    debug_log(item.id(), item.url(), requested_at, &response);

    let callback_response = CallbackResponse {
        url: item.url().to_string(),
        method: response.method,
        status: response.status,
        headers: response.headers,
        body: response.body,
        requested_at,
        elapsed: start.elapsed(),
    };
    // 回调 panic 只算这一个请求失败
    panic::catch_unwind(AssertUnwindSafe(|| (item.callback())(callback_response)))
        .map_err(|payload| Error::CallbackPanicked(panic_message(payload.as_ref())))
}

/// 执行单个请求，失败只记录日志，不影响同批次的其他请求
pub async fn run_item(session: &dyn Session, item: &RequestItem) {
    if let Err(e) = execute_item(session, item).await {
        report_failure(item, &e);
    }
}

fn report_failure(item: &RequestItem, error: &Error) {
    if error.is_benign() {
        return;
    }
    tracing::warn!(id = item.id(), url = item.url(), method = %item.method(), "request failed: {}", error);
}
