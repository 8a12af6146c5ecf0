//! Test utilities and common setup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use fxrelay::api::{self, AppState};
use fxrelay::exchange::{ExchangeService, RateClient};
use fxrelay::journal::CommandJournal;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Create application state backed by a temp journal and the given rate
/// source. Returns the journal path for assertions.
pub async fn test_state(
    source_url: &str,
    default_days: u32,
) -> (AppState, PathBuf, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let journal_path = dir.path().join("exchange_log.txt");
    let journal = CommandJournal::open(journal_path.clone()).await.unwrap();
    let client = RateClient::new(
        source_url,
        vec!["EUR".to_string(), "USD".to_string(), "PLN".to_string()],
        Duration::from_secs(2),
    );
    let service = ExchangeService::new(client, journal, default_days);
    (AppState::new(service), journal_path, dir)
}

/// Create a test application whose rate source refuses connections.
pub async fn test_app() -> (Router, tempfile::TempDir) {
    let (state, _journal_path, dir) = test_state("http://127.0.0.1:1", 1).await;
    (api::create_router(state), dir)
}

/// Serve a full application on an ephemeral port.
pub async fn spawn_app(
    source_url: &str,
    default_days: u32,
) -> (SocketAddr, PathBuf, tempfile::TempDir) {
    let (state, journal_path, dir) = test_state(source_url, default_days).await;
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (addr, journal_path, dir)
}

/// Open a WebSocket connection to a spawned application.
pub async fn connect_ws(addr: SocketAddr) -> WsClient {
    let (socket, _response) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
}

/// Read frames until a text frame arrives, answering pings along the way.
pub async fn recv_text(client: &mut WsClient) -> String {
    loop {
        match client.next().await.expect("connection closed").unwrap() {
            Message::Text(text) => return text.to_string(),
            Message::Ping(payload) => {
                client.send(Message::Pong(payload)).await.unwrap();
            }
            _ => {}
        }
    }
}

/// Like `recv_text`, but gives up after `wait`.
pub async fn try_recv_text(client: &mut WsClient, wait: Duration) -> Option<String> {
    tokio::time::timeout(wait, recv_text(client)).await.ok()
}

/// Poll the health endpoint until the server reports `count` connections.
pub async fn wait_for_connections(addr: SocketAddr, count: usize) {
    for _ in 0..50 {
        let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if health["connections"] == count as u64 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server never reached {count} connections");
}

/// Spawn a stub rate source. Requests for dates in `failing` return 500;
/// every other date returns USD/EUR/PLN/GBP records, with no purchase
/// price for PLN.
pub async fn spawn_rate_source(failing: Vec<String>) -> String {
    async fn rates(
        State(failing): State<Arc<Vec<String>>>,
        RawQuery(query): RawQuery,
    ) -> Response {
        let query = query.unwrap_or_default();
        let date = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("date="))
            .unwrap_or_default()
            .to_string();

        if failing.contains(&date) {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }

        Json(json!({
            "date": date,
            "bank": "PB",
            "exchangeRate": [
                { "currency": "USD", "saleRate": 37.5, "purchaseRate": 36.9 },
                { "currency": "EUR", "saleRate": 40.1, "purchaseRate": 39.2 },
                { "currency": "PLN", "saleRate": 9.1 },
                { "currency": "GBP", "saleRate": 46.0, "purchaseRate": 45.1 },
            ],
        }))
        .into_response()
    }

    let router = Router::new()
        .route("/", get(rates))
        .with_state(Arc::new(failing));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// The `days` most recent dates formatted the way the rate source keys them.
pub fn recent_dates(days: u32) -> Vec<String> {
    let today = chrono::Local::now().date_naive();
    (0..u64::from(days))
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset)))
        .map(|date| date.format("%d.%m.%Y").to_string())
        .collect()
}
