//! Test utilities for integration tests in the daemon crate.
#![allow(dead_code)]

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;

/// Run the given future with a timeout, failing the test if it elapses.
pub async fn run_with_timeout<F, T>(duration: Duration, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(duration, fut)
        .await
        .expect("test timed out")
}

/// Run a future with a default timeout of 60 seconds.
pub async fn run_with_default_timeout<F, T>(fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    run_with_timeout(Duration::from_secs(60), fut).await
}

/// Start a probe target on an ephemeral port and return its base URL
///
/// `/ok` answers 204 with no body, `/ready` answers 200 `ready`,
/// `/warming` answers 200 `warming up`, anything else 404.
pub async fn start_target() -> String {
    let make_svc = make_service_fn(|_conn| async {
        Ok::<_, Infallible>(service_fn(|req: Request<Body>| async move {
            let response = match req.uri().path() {
                "/ok" => Response::builder().status(204).body(Body::empty()),
                "/ready" => Response::builder().status(200).body(Body::from("ready")),
                "/warming" => Response::builder().status(200).body(Body::from("warming up")),
                _ => Response::builder().status(404).body(Body::from("not found")),
            };
            Ok::<_, Infallible>(response.unwrap())
        }))
    });

    let addr = ([127, 0, 0, 1], 0).into();
    let server = Server::bind(&addr).serve(make_svc);
    let port = server.local_addr().port();
    tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("Target server error: {}", e);
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A local port with nothing listening on it
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("local_addr").port()
}

/// Locate a binary built from this package
pub fn bin_path(name: &str) -> PathBuf {
    if let Some(p) = std::env::var_os(format!("CARGO_BIN_EXE_{}", name)) {
        return PathBuf::from(p);
    }
    // Fallback: derive from current test exe location (target/debug/deps/...)
    let exe = std::env::current_exe().expect("current_exe");
    let debug_dir = exe.parent().and_then(|p| p.parent()).expect("debug dir");
    let candidate = debug_dir.join(name);
    if candidate.exists() {
        return candidate;
    }
    panic!("Unable to locate {} binary", name);
}

/// Child process killed when dropped
pub struct ChildGuard(pub Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Poll until something accepts TCP connections on `port`
pub async fn wait_for_port(port: u16, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("nothing listening on port {} after {:?}", port, timeout);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
