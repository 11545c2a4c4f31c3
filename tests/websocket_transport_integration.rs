//! Integration tests for the tokio-tungstenite transport.
//!
//! Runs a local axum WebSocket server that behaves like the performance
//! status endpoint:
//! 1. Sends an `initial_status` snapshot on connect
//! 2. Answers `{"type":"ping"}` with `{"type":"pong"}`
//! 3. Pushes a `performance_update` when asked to
//! 4. Closes with code 4000 when sent `bye`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use aion_live::adapters::testing::RecordingObserver;
use aion_live::adapters::TungsteniteTransport;
use aion_live::application::{ChannelOptions, LiveChannel, ObserverFanout, PerformanceView};
use aion_live::domain::channel::ConnectionState;
use aion_live::ports::{OutboundFrame, Transport, TransportError, TransportEvent};

// =============================================================================
// Test Server
// =============================================================================

const PATH: &str = "/pei-ml/ws/performance/status";

const INITIAL_STATUS: &str = r#"{"type":"initial_status","data":{
    "cell_1_window_5": {"cell_index": 1, "latest_mse": 0.4, "history": [{"timestamp": 1.0, "mse": 0.4}]},
    "cell_2_window_10": {"cell_index": 2, "latest_mse": 0.2, "history": []}
}}"#;

const UPDATE: &str = r#"{"type":"performance_update","model_key":"cell_3_window_5",
    "data":{"cell_index": 3, "latest_mse": 0.7, "history": [{"timestamp": 2.0, "mse": 0.7}]}}"#;

async fn upgrade(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(mut socket: WebSocket) {
    if socket
        .send(Message::Text(INITIAL_STATUS.to_string()))
        .await
        .is_err()
    {
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        let reply = match message {
            Message::Text(text) if text == r#"{"type":"ping"}"# => {
                Message::Text(r#"{"type":"pong"}"#.to_string())
            }
            Message::Text(text) if text == "push" => Message::Text(UPDATE.to_string()),
            Message::Text(text) if text == "binary" => {
                Message::Binary(br#"{"type":"heartbeat"}"#.to_vec())
            }
            Message::Text(text) if text == "bye" => {
                let _ = socket
                    .send(Message::Close(Some(CloseFrame {
                        code: 4000,
                        reason: "bye".into(),
                    })))
                    .await;
                return;
            }
            Message::Close(_) => return,
            _ => continue,
        };
        if socket.send(reply).await.is_err() {
            return;
        }
    }
}

async fn serve() -> SocketAddr {
    let app = Router::new().route(PATH, get(upgrade));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn ws_url(addr: SocketAddr) -> String {
    format!("ws://{}{}", addr, PATH)
}

async fn next_event(events: &mut tokio::sync::mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for transport event")
        .expect("event stream ended")
}

/// Poll `condition` until it holds or five seconds pass.
async fn eventually(condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 5 seconds"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn transport_exchanges_text_frames() {
    let addr = serve().await;
    let transport = TungsteniteTransport::new();
    let mut link = transport.connect(&ws_url(addr)).await.unwrap();

    assert!(matches!(
        next_event(&mut link.events).await,
        TransportEvent::Text(text) if text.contains("initial_status")
    ));

    link.outbound
        .send(OutboundFrame::Text(r#"{"type":"ping"}"#.to_string()))
        .unwrap();
    assert_eq!(
        next_event(&mut link.events).await,
        TransportEvent::Text(r#"{"type":"pong"}"#.to_string())
    );
}

#[tokio::test]
async fn transport_decodes_binary_frames_as_text() {
    let addr = serve().await;
    let mut link = TungsteniteTransport::new()
        .connect(&ws_url(addr))
        .await
        .unwrap();
    next_event(&mut link.events).await;

    link.outbound
        .send(OutboundFrame::Text("binary".to_string()))
        .unwrap();
    assert_eq!(
        next_event(&mut link.events).await,
        TransportEvent::Text(r#"{"type":"heartbeat"}"#.to_string())
    );
}

#[tokio::test]
async fn transport_reports_server_close_code() {
    let addr = serve().await;
    let mut link = TungsteniteTransport::new()
        .connect(&ws_url(addr))
        .await
        .unwrap();
    next_event(&mut link.events).await;

    link.outbound.send(OutboundFrame::Text("bye".to_string())).unwrap();
    match next_event(&mut link.events).await {
        TransportEvent::Closed(reason) => {
            assert_eq!(reason.code, Some(4000));
            assert_eq!(reason.reason, "bye");
        }
        other => panic!("expected close, got {:?}", other),
    }
}

#[tokio::test]
async fn transport_fails_on_unknown_path() {
    let addr = serve().await;
    let err = TungsteniteTransport::new()
        .connect(&format!("ws://{}/nope", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Connect(_)));
}

// =============================================================================
// Live channel over a real socket
// =============================================================================

#[tokio::test]
async fn performance_view_follows_live_endpoint() {
    let addr = serve().await;
    let view = Arc::new(PerformanceView::new(100));
    let channel = LiveChannel::open(
        ws_url(addr),
        ChannelOptions::default(),
        Arc::new(TungsteniteTransport::new()),
        view.clone(),
    );

    eventually(|| view.revision() >= 1).await;
    assert!(view.is_connected());
    assert_eq!(view.window_sizes(), vec![5, 10]);

    assert!(channel.send("push"));
    eventually(|| view.revision() >= 2).await;
    let series = view.series_for_window(5);
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].cell_index, 3);

    assert!(channel.send_json(&serde_json::json!({"type": "ping"})));
    eventually(|| channel.last_message().is_some_and(|m| m.tag == "pong")).await;

    channel.close();
    assert_eq!(channel.state(), ConnectionState::Closed);
    eventually(|| !view.is_connected()).await;
}

#[tokio::test]
async fn channel_reconnects_after_server_close() {
    let addr = serve().await;
    let view = Arc::new(PerformanceView::new(100));
    let recorder = Arc::new(RecordingObserver::new());
    let observer = ObserverFanout::new().with(view.clone()).with(recorder.clone());
    let channel = LiveChannel::open(
        ws_url(addr),
        ChannelOptions::default()
            .with_reconnect_delay(Duration::from_millis(50))
            .with_max_reconnect_attempts(3),
        Arc::new(TungsteniteTransport::new()),
        Arc::new(observer),
    );

    eventually(|| recorder.opens() == 1).await;
    assert!(channel.send("bye"));

    eventually(|| recorder.opens() == 2).await;
    let closes = recorder.closes();
    assert_eq!(closes.len(), 1);
    assert_eq!(closes[0].reason.code, Some(4000));
    assert!(closes[0].reconnect_scheduled);

    eventually(|| channel.state() == ConnectionState::Open).await;
    assert_eq!(channel.reconnect_attempts(), 0);
    assert_eq!(view.window_sizes(), vec![5, 10]);
}
