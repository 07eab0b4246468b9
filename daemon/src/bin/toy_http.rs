#![allow(unused_crate_dependencies)]
//! Simple HTTP (HTTP/1.1) toy target for E2E tests
//!
//! Behavior:
//! - Reads `PORT` env var or first CLI arg (default 8082)
//! - Prints "ready" to stdout once listening
//! - `/health` responds 200 with body "healthy"
//! - `/status/<code>` responds with that status code and body "status <code>"
//! - Any other path responds 200 with body "ok"
//! - Single-threaded accept loop, per-connection handler thread

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn handle_client(mut stream: TcpStream) {
    // Read a small buffer to get the request line; we don't implement full HTTP parsing
    let mut buf = [0u8; 1024];
    let _ = stream.read(&mut buf);

    let req = String::from_utf8_lossy(&buf);
    let first_line = req.lines().next().unwrap_or("");
    let path = first_line.split_whitespace().nth(1).unwrap_or("/");

    let (code, body) = if path == "/health" {
        (200, "healthy".to_string())
    } else if let Some(code) = path
        .strip_prefix("/status/")
        .and_then(|c| c.parse::<u16>().ok())
    {
        (code, format!("status {}", code))
    } else {
        (200, "ok".to_string())
    };

    let headers = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        code,
        reason(code),
        body.len()
    );

    let _ = stream.write_all(headers.as_bytes());
    let _ = stream.write_all(body.as_bytes());
    let _ = stream.flush();
}

fn main() -> std::io::Result<()> {
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .or_else(|| std::env::args().nth(1).and_then(|s| s.parse().ok()))
        .unwrap_or(8082);

    let listener = TcpListener::bind(("127.0.0.1", port))?;

    println!("ready");
    let _ = std::io::stdout().flush();

    for stream in listener.incoming() {
        match stream {
            Ok(s) => {
                thread::spawn(|| handle_client(s));
            }
            Err(_e) => break,
        }
    }
    Ok(())
}
