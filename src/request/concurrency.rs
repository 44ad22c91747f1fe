use std::fmt;
use futures::future::join_all;
use crate::network::Session;
use crate::request::executor::run_item;
use crate::request::RequestItem;

/// 批次执行策略
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// 按队列顺序逐个执行，上一个回调返回后才开始下一个
    Sequential,
    /// 全部并发执行，完成顺序不确定
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => f.write_str("sequential"),
            Strategy::Parallel => f.write_str("parallel"),
        }
    }
}

pub async fn execute_sequential(session: &dyn Session, items: &[RequestItem]) {
    for item in items {
        run_item(session, item).await;
    }
}

pub async fn execute_parallel(session: &dyn Session, items: &[RequestItem]) {
    join_all(items.iter().map(|item| run_item(session, item))).await;
}

pub async fn execute(strategy: Strategy, session: &dyn Session, items: &[RequestItem]) {
    match strategy {
        Strategy::Sequential => execute_sequential(session, items).await,
        Strategy::Parallel => execute_parallel(session, items).await,
    }
}
