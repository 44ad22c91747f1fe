use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use rusty_req_queue::{CallbackResponse, ClientConfig, ExecutionRunner, Method, ProxyConfig, Queue, ReqwestConnector, RequestOptions, WorkerPool};

fn spawn_server() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("server runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route("/a", get(|| async { "a" }))
                .route("/b", get(|| async { "b" }))
                .route("/c", get(|| async { "c" }))
                .route("/echo", post(|body: String| async move { format!("echo:{}", body) }))
                .route("/moved", get(|| async { Redirect::temporary("/a") }))
                .route("/slow", get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "slow"
                }));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
            tx.send(listener.local_addr().expect("addr")).expect("send addr");
            axum::serve(listener, app).await.expect("serve");
        });
    });
    rx.recv().expect("server address")
}

// 测试请求本地服务，不走环境变量里的代理
fn local_config() -> ClientConfig {
    ClientConfig { proxy: Some(ProxyConfig::default().trust_env(false)), ..Default::default() }
}

fn local_queue() -> Queue {
    Queue::with_config(local_config())
}

type Bodies = Arc<Mutex<HashMap<String, (u16, String)>>>;

fn collect(bodies: &Bodies) -> impl Fn(CallbackResponse) + Send + Sync + 'static {
    let bodies = bodies.clone();
    move |resp: CallbackResponse| {
        bodies.lock().unwrap().insert(resp.url.clone(), (resp.status, resp.text().into_owned()));
    }
}

#[test]
fn test_parallel_end_to_end() {
    let addr = spawn_server();
    let queue = local_queue();
    let bodies: Bodies = Default::default();

    for path in ["a", "b", "c"] {
        assert!(queue.add(&format!("http://{}/{}", addr, path), Method::Get, collect(&bodies)));
    }

    assert!(queue.run_parallel(true, false));

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 3);
    for path in ["a", "b", "c"] {
        assert_eq!(bodies[&format!("http://{}/{}", addr, path)], (200, path.to_string()));
    }
    assert!(!queue.is_loading());
    assert!(queue.is_empty());
}

#[test]
fn test_post_sends_body() {
    let addr = spawn_server();
    let queue = local_queue();
    let bodies: Bodies = Default::default();
    let url = format!("http://{}/echo", addr);

    queue.add_with(&url, Method::Post, RequestOptions::new().body("ping"), collect(&bodies));
    queue.run_sequential(true, false);

    assert_eq!(bodies.lock().unwrap()[&url], (200, "echo:ping".to_string()));
}

#[test]
fn test_redirect_flag() {
    let addr = spawn_server();
    let queue = local_queue();
    let followed: Bodies = Default::default();
    let kept: Arc<Mutex<Option<(u16, Option<String>)>>> = Default::default();
    let url = format!("http://{}/moved", addr);

    queue.add(&url, Method::Get, collect(&followed));
    queue.run_sequential(true, false);
    assert_eq!(followed.lock().unwrap()[&url], (200, "a".to_string()));

    let sink = kept.clone();
    queue.add_with(&url, Method::Get, RequestOptions::new().follow_redirects(false), move |resp| {
        *sink.lock().unwrap() = Some((resp.status, resp.header("location").map(str::to_string)));
    });
    queue.run_sequential(true, false);
    assert_eq!(*kept.lock().unwrap(), Some((307, Some("/a".to_string()))));
}

#[test]
fn test_timeout_and_refused_connection_do_not_stop_batch() {
    let addr = spawn_server();
    let queue = local_queue();
    let bodies: Bodies = Default::default();
    let slow = format!("http://{}/slow", addr);
    let ok = format!("http://{}/b", addr);

    queue.add_with(&slow, Method::Get, RequestOptions::new().timeout(Duration::from_millis(200)), collect(&bodies));
    queue.add("http://127.0.0.1:1/", Method::Get, collect(&bodies));
    queue.add(&ok, Method::Get, collect(&bodies));

    queue.run_parallel(true, false);

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[&ok], (200, "b".to_string()));
}

#[test]
fn test_background_run_with_wait() {
    let addr = spawn_server();
    let runner = ExecutionRunner::with_pool(
        Arc::new(ReqwestConnector::new(local_config())),
        Arc::new(WorkerPool::new(1).unwrap()),
    );
    let queue = Queue::with_runner(runner);
    let bodies: Bodies = Default::default();
    for path in ["a", "b"] {
        queue.add(&format!("http://{}/{}", addr, path), Method::Get, collect(&bodies));
    }

    assert!(queue.run_sequential(true, true));
    assert!(queue.wait_for_finish(Some(Duration::from_secs(10))));
    assert_eq!(bodies.lock().unwrap().len(), 2);
    assert!(queue.is_empty());
}

#[test]
fn test_single_foreground() {
    let addr = spawn_server();
    let runner = ExecutionRunner::with_pool(
        Arc::new(ReqwestConnector::new(local_config())),
        Arc::new(WorkerPool::new(1).unwrap()),
    );
    let bodies: Bodies = Default::default();
    let url = format!("http://{}/c", addr);

    assert!(runner.single(&url, Method::Get, RequestOptions::new(), false, collect(&bodies)));
    assert_eq!(bodies.lock().unwrap()[&url], (200, "c".to_string()));
}
