//! In-process HTTP/1.1 stub for exercising [`GitHubClient`](super::GitHubClient)
//! over a real socket.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
pub struct Route {
    /// Path plus query exactly as the client sends it.
    pub target: String,
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Route {
    pub fn json(target: &str, status: u16, body: serde_json::Value) -> Self {
        Self::raw(target, status, &body.to_string())
    }

    pub fn raw(target: &str, status: u16, body: &str) -> Self {
        Self {
            target: target.to_string(),
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub target: String,
    pub headers: String,
}

pub struct StubServer {
    addr: std::net::SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    task: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let log = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                tokio::spawn(async move { serve(stream, &routes, &log).await });
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, routes: &[Route], log: &Mutex<Vec<Recorded>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    log.lock().unwrap().push(Recorded {
        target: target.clone(),
        headers: head,
    });

    let route = routes.iter().find(|r| r.target == target);
    let (status, body, delay) = match route {
        Some(r) => (r.status, r.body.as_str(), r.delay),
        None => (404, r#"{"message":"Not Found"}"#, Duration::ZERO),
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let response = format!(
        "HTTP/1.1 {status} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

// ---------------------------------------------------------------------------
// Scripted fetcher
// ---------------------------------------------------------------------------

/// A [`Fetcher`](super::Fetcher) answering from a fixed table, with optional
/// per-path latency. Unknown paths answer `NetworkError`.
#[derive(Default)]
pub struct ScriptedFetcher {
    answers: Vec<(String, super::RequestOutcome, Duration)>,
    log: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, path: &str, outcome: super::RequestOutcome) -> Self {
        self.answers.push((path.to_string(), outcome, Duration::ZERO));
        self
    }

    pub fn answer_after(
        mut self,
        path: &str,
        delay: Duration,
        outcome: super::RequestOutcome,
    ) -> Self {
        self.answers.push((path.to_string(), outcome, delay));
        self
    }

    /// Paths requested so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl super::Fetcher for ScriptedFetcher {
    fn fetch(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = super::RequestOutcome> + Send {
        self.log.lock().unwrap().push(path.to_string());
        let answer = self
            .answers
            .iter()
            .find(|(p, _, _)| p == path)
            .map(|(_, outcome, delay)| (outcome.clone(), *delay));
        async move {
            match answer {
                Some((outcome, delay)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    outcome
                }
                None => super::RequestOutcome::NetworkError,
            }
        }
    }
}
