use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{panic_message, Error, Result};
use crate::network::{ClientConfig, Connector, ReqwestConnector};
use crate::request::{execute, CallbackResponse, Method, RequestItem, RequestOptions, Strategy};
use crate::runner::WorkerPool;

// 关闭执行上下文时给残留任务的宽限时间
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

// 全局共享的后台线程池
static GLOBAL_POOL: Lazy<Arc<WorkerPool>> = Lazy::new(|| {
    let workers = ClientConfig::from_env().background_workers;
    Arc::new(WorkerPool::new(workers).expect("Failed to spawn background workers"))
});

/// 为每个批次创建独立的单线程运行时，执行完毕后关闭
#[derive(Clone)]
pub struct ExecutionRunner {
    connector: Arc<dyn Connector>,
    pool: Arc<WorkerPool>,
}

impl Default for ExecutionRunner {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestConnector::new(ClientConfig::from_env())))
    }
}

impl ExecutionRunner {
    /// 使用全局后台线程池
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector, pool: GLOBAL_POOL.clone() }
    }

    pub fn with_pool(connector: Arc<dyn Connector>, pool: Arc<WorkerPool>) -> Self {
        Self { connector, pool }
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// 在当前线程上执行一个批次：创建运行时、打开会话、执行、关闭
    pub fn run_batch(&self, strategy: Strategy, items: &[RequestItem]) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let connector = &self.connector;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            runtime.block_on(async {
                let session = connector.open_session()?;
                execute(strategy, session.as_ref(), items).await;
                Ok::<(), Error>(())
            })
        }));

        runtime.shutdown_timeout(SHUTDOWN_GRACE);

        match outcome {
            Ok(result) => result,
            Err(payload) => Err(Error::BatchPanicked(panic_message(payload.as_ref()))),
        }
    }

    /// background 为 true 时提交到线程池，否则阻塞当前线程直到完成
    pub(crate) fn launch<F>(&self, background: bool, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if background {
            // 提交失败时 job 被丢弃，其中持有的资源随之释放
            if let Err(e) = self.pool.submit(job) {
                report_batch_failure(&e);
            }
            return;
        }

        if tokio::runtime::Handle::try_current().is_ok() {
            // 已经在 tokio 运行时里，不能再 block_on，换一个线程并等待它结束
            if std::thread::spawn(job).join().is_err() {
                tracing::error!("foreground batch thread panicked");
            }
        } else {
            job();
        }
    }

    /// 不经过队列直接执行一个请求，url 为空时返回 false
    pub fn single<F>(&self, url: &str, method: Method, options: RequestOptions, background: bool, callback: F) -> bool
    where
        F: Fn(CallbackResponse) + Send + Sync + 'static,
    {
        if url.is_empty() {
            return false;
        }

        let item = RequestItem::new(0, url.to_string(), method, options, Arc::new(callback));
        let runner = self.clone();
        self.launch(background, move || {
            if let Err(e) = runner.run_batch(Strategy::Sequential, std::slice::from_ref(&item)) {
                report_batch_failure(&e);
            }
        });
        true
    }
}

pub(crate) fn report_batch_failure(error: &Error) {
    if error.is_benign() {
        return;
    }
    tracing::error!("batch failed: {}", error);
}
