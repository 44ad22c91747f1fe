// request/mod.rs

pub mod concurrency;
pub mod executor;
pub mod method;
pub mod request_item;
pub mod response;

// 重新导出，方便上层直接使用
pub use concurrency::{execute, execute_parallel, execute_sequential, Strategy};
pub use executor::{execute_item, run_item};
pub use method::Method;
pub use request_item::{Callback, RequestItem, RequestOptions, DEFAULT_TIMEOUT};
pub use response::CallbackResponse;
