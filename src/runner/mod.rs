pub mod execution;
pub mod pool;

pub use execution::ExecutionRunner;
pub use pool::WorkerPool;
