//! In-process HTTP target used by probe and runner tests

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use std::convert::Infallible;
use std::time::Duration;
use tokio::task;

/// Start a target server on an ephemeral port and return the port
///
/// Routes:
/// - `/health` → 200 `healthy`
/// - `/empty` → 204 with no body
/// - `/warming` → 200 `warming up`
/// - `/bad` → 500 `error`
/// - `/echo` → 200, body lists method, headers and request body length
/// - `/slow` → 200 after 5 seconds
/// - anything else → 404 `not found`
pub(crate) async fn start_test_server() -> u16 {
    let make_svc = make_service_fn(|_conn| async {
        Ok::<_, Infallible>(service_fn(|req| async move { Ok::<_, Infallible>(route(req).await) }))
    });

    let addr = ([127, 0, 0, 1], 0).into();
    let server = Server::bind(&addr).serve(make_svc);
    let port = server.local_addr().port();

    task::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("Server error: {}", e);
        }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    port
}

async fn route(req: Request<Body>) -> Response<Body> {
    match req.uri().path() {
        "/health" => Response::new(Body::from("healthy")),
        "/empty" => reply(204, Body::empty()),
        "/warming" => Response::new(Body::from("warming up")),
        "/bad" => reply(500, Body::from("error")),
        "/echo" => {
            let mut echo = format!("{}\n", req.method());
            for (name, value) in req.headers() {
                echo.push_str(&format!(
                    "{}: {}\n",
                    name,
                    String::from_utf8_lossy(value.as_bytes())
                ));
            }
            let body = hyper::body::to_bytes(req.into_body())
                .await
                .unwrap_or_default();
            echo.push_str(&format!("body-len: {}\n", body.len()));
            Response::new(Body::from(echo))
        }
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Response::new(Body::from("late"))
        }
        _ => reply(404, Body::from("not found")),
    }
}

fn reply(status: u16, body: Body) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(body)
        .unwrap()
}

/// A local port with nothing listening on it
pub(crate) fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("Failed to get local address").port()
}
