//! In-process server and WebSocket client helpers for the integration tests.

#![allow(dead_code)]

use std::{collections::VecDeque, net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use quoteroom_server::{
    app::App,
    config::ServerConfig,
    domain::{QuoteError, QuoteSource, Room, RoomId, StockQuote},
};
use quoteroom_shared::time::SystemClock;
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(3);

/// Quote source answering from a fixed table
pub struct FakeQuotes {
    quotes: Vec<(&'static str, &'static str)>,
}

impl FakeQuotes {
    pub fn new(quotes: Vec<(&'static str, &'static str)>) -> Self {
        Self { quotes }
    }
}

#[async_trait]
impl QuoteSource for FakeQuotes {
    async fn fetch_quote(&self, symbol: &str) -> Result<StockQuote, QuoteError> {
        let (_, close) = self
            .quotes
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| QuoteError::Unavailable(symbol.to_string()))?;
        Ok(StockQuote {
            symbol: symbol.to_uppercase(),
            date: "2026-10-16".to_string(),
            time: "22:00:09".to_string(),
            open: close.to_string(),
            high: close.to_string(),
            low: close.to_string(),
            close: close.to_string(),
            volume: "1000".to_string(),
        })
    }
}

/// Helper struct to manage an in-process server
pub struct TestServer {
    pub addr: SocketAddr,
    pub app: Arc<App>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
    workers: Vec<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server with rooms `r1` and `r2` on an ephemeral port
    pub async fn start(quotes: FakeQuotes) -> Self {
        let config = ServerConfig {
            rooms: vec![
                Room::new(RoomId::new("r1".to_string()).unwrap(), "Room 1"),
                Room::new(RoomId::new("r2".to_string()).unwrap(), "Room 2"),
            ],
            ..ServerConfig::default()
        };
        let app = Arc::new(App::new(config, Arc::new(quotes), Arc::new(SystemClock)));
        let workers = app.spawn_workers();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();
        let server = app.server();
        let server = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            app,
            shutdown: Some(shutdown),
            server: Some(server),
            workers,
        }
    }

    pub fn ws_url(&self, room_id: &str, user_id: &str, user_name: &str) -> String {
        format!(
            "ws://{}/ws/chatroom/{}?user_id={}&user_name={}",
            self.addr, room_id, user_id, user_name
        )
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop the HTTP side, then drain and stop the workers
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.app.shutdown(std::mem::take(&mut self.workers)).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
        for worker in &self.workers {
            worker.abort();
        }
    }
}

/// Helper struct wrapping a WebSocket client
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Records received in a batched frame but not yet consumed
    pending: VecDeque<Value>,
}

impl TestClient {
    pub async fn connect(url: &str) -> Self {
        let (ws, _response) = connect_async(url).await.unwrap();
        Self {
            ws,
            pending: VecDeque::new(),
        }
    }

    pub async fn send(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    /// Next chat record, unbatching newline-separated frames
    pub async fn next_message(&mut self) -> Option<Value> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(record);
            }
            let frame = tokio::time::timeout(RECEIVE_TIMEOUT, self.ws.next())
                .await
                .ok()??
                .ok()?;
            match frame {
                Message::Text(text) => {
                    for line in text.as_str().split('\n') {
                        self.pending.push_back(serde_json::from_str(line).unwrap());
                    }
                }
                Message::Close(_) => return None,
                _ => {}
            }
        }
    }

    /// Text of the next chat record
    pub async fn next_text(&mut self) -> String {
        let record = self.next_message().await.expect("expected a chat message");
        record["text"].as_str().unwrap().to_string()
    }

    /// Asserts that nothing arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Some(record) = self.pending.pop_front() {
            panic!("unexpected message: {}", record);
        }
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.ws.next()).await
        {
            panic!("unexpected message: {}", text.as_str());
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
