use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
pub struct StubRoute {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubRoute {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Minimal canned-response HTTP server. Routes are matched on the request
/// path with the query string stripped, and can be swapped while running.
pub struct StubServer {
    pub addr: SocketAddr,
    routes: Arc<Mutex<HashMap<String, StubRoute>>>,
    _accept: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener addr");
        let routes: Arc<Mutex<HashMap<String, StubRoute>>> = Arc::new(Mutex::new(HashMap::new()));

        let accept_routes = Arc::clone(&routes);
        let accept = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&accept_routes);
                tokio::spawn(async move {
                    serve(stream, routes).await;
                });
            }
        });

        Self {
            addr,
            routes,
            _accept: accept,
        }
    }

    pub fn route(&self, path: &str, route: StubRoute) {
        self.routes
            .lock()
            .expect("stub route table")
            .insert(path.to_string(), route);
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

async fn serve(mut stream: TcpStream, routes: Arc<Mutex<HashMap<String, StubRoute>>>) {
    let mut buffer = vec![0_u8; 8192];
    let mut read = 0;
    loop {
        let Ok(count) = stream.read(&mut buffer[read..]).await else {
            return;
        };
        if count == 0 {
            break;
        }
        read += count;
        if buffer[..read].windows(4).any(|window| window == b"\r\n\r\n") {
            break;
        }
        if read == buffer.len() {
            break;
        }
    }

    let request = String::from_utf8_lossy(&buffer[..read]);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target);

    let route = routes
        .lock()
        .expect("stub route table")
        .get(path)
        .cloned()
        .unwrap_or_else(|| StubRoute::error(404));

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        reason(route.status),
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
