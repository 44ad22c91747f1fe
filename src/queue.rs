use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use crate::network::{ClientConfig, Connector, ReqwestConnector};
use crate::request::{CallbackResponse, Method, RequestItem, RequestOptions, Strategy};
use crate::runner::execution::report_batch_failure;
use crate::runner::ExecutionRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

struct QueueState {
    items: Vec<RequestItem>,
    next_id: u64,
}

struct QueueInner {
    state: Mutex<QueueState>,
    running: AtomicBool,
    runner: ExecutionRunner,
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 批次结束时释放运行标记，包括出错、panic 和任务未被执行就被丢弃的情况
struct RunningGuard(Arc<QueueInner>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::Release);
    }
}

/// 有序的 HTTP 请求队列，同一时间最多只有一个批次在执行。
///
/// 克隆得到的是同一个队列的句柄。批次执行期间（`clear = true`）从其他线程修改队列的结果
/// 由调用方自行同步；批次结束时只移除本批次执行过的请求。
#[derive(Clone)]
pub struct Queue {
    inner: Arc<QueueInner>,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_connector(Arc::new(ReqwestConnector::new(config)))
    }

    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        Self::with_runner(ExecutionRunner::new(connector))
    }

    pub fn with_runner(runner: ExecutionRunner) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState { items: Vec::new(), next_id: 1 }),
                running: AtomicBool::new(false),
                runner,
            }),
        }
    }

    pub fn add<F>(&self, url: &str, method: Method, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        self.add_with(url, method, RequestOptions::default(), callback)
    }

    /// 追加到队尾，url 为空时返回 false
    pub fn add_with<F>(&self, url: &str, method: Method, options: RequestOptions, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        self.push(None, url, method, options, callback)
    }

    pub fn insert<F>(&self, index: isize, url: &str, method: Method, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        self.insert_with(index, url, method, RequestOptions::default(), callback)
    }

    /// 插入到 index 处，超过队列长度时放到队尾；index 为负数时返回 false
    pub fn insert_with<F>(&self, index: isize, url: &str, method: Method, options: RequestOptions, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        if index < 0 {
            return false;
        }
        self.push(Some(index as usize), url, method, options, callback)
    }

    fn push<F>(&self, index: Option<usize>, url: &str, method: Method, options: RequestOptions, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        if url.is_empty() {
            return false;
        }

        let mut state = self.inner.lock();
        let id = state.next_id;
        state.next_id += 1;

        let item = RequestItem::new(id, url.to_string(), method, options, Arc::new(callback));
        let index = index.unwrap_or(state.items.len()).min(state.items.len());
        state.items.insert(index, item);
        tracing::debug!(id, url, %method, index, "request queued");
        true
    }

    /// 移除所有 url 相同的请求。
    ///
    /// 旧实现还会顺带删除没有 url 的条目；这里入队时已拒绝空 url，所以不存在这种条目。
    pub fn remove(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        let mut state = self.inner.lock();
        let before = state.items.len();
        state.items.retain(|item| item.url() != url);
        tracing::debug!(url, removed = before - state.items.len(), "requests removed");
        true
    }

    pub fn is_loading(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前队列内容的快照
    pub fn items(&self) -> Vec<RequestItem> {
        self.inner.lock().items.clone()
    }

    /// 轮询等待当前批次结束。返回 true 表示队列已空闲，false 表示超时（批次本身不会被中止）
    pub fn wait_for_finish(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        while self.is_loading() {
            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    POLL_INTERVAL.min(deadline - now)
                }
                None => POLL_INTERVAL,
            };
            thread::sleep(pause);
        }
        true
    }

    /// 按顺序逐个执行。已有批次在执行时直接返回 false
    pub fn run_sequential(&self, clear: bool, background: bool) -> bool {
        self.run(Strategy::Sequential, clear, background)
    }

    /// 共享一个会话并发执行全部请求。已有批次在执行时直接返回 false
    pub fn run_parallel(&self, clear: bool, background: bool) -> bool {
        self.run(Strategy::Parallel, clear, background)
    }

    fn run(&self, strategy: Strategy, clear: bool, background: bool) -> bool {
        if self.inner.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(%strategy, "batch already running, run request ignored");
            return false;
        }

        let guard = RunningGuard(self.inner.clone());
        let items = self.items();
        let inner = self.inner.clone();

        self.inner.runner.launch(background, move || {
            let _guard = guard;
            tracing::debug!(%strategy, count = items.len(), "batch started");

            if let Err(e) = inner.runner.run_batch(strategy, &items) {
                report_batch_failure(&e);
            }

            if clear {
                let executed: HashSet<u64> = items.iter().map(RequestItem::id).collect();
                inner.lock().items.retain(|item| !executed.contains(&item.id()));
            }
            tracing::debug!(%strategy, "batch finished");
        });
        true
    }

    /// 不经过任何队列执行一个请求，使用默认的 reqwest 连接器和全局线程池
    pub fn single<F>(url: &str, method: Method, options: RequestOptions, background: bool, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        ExecutionRunner::default().single(url, method, options, background, callback)
    }
}
