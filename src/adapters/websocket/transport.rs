//! `Transport` implementation backed by `tokio-tungstenite`.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::ports::{
    CloseReason, OutboundFrame, Transport, TransportError, TransportEvent, TransportLink,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket connections with `connect_async`.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport {
    connect_timeout: Option<Duration>,
}

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on a handshake that takes longer than `timeout`.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    async fn handshake(&self, url: &str) -> Result<Socket, TransportError> {
        let connect = connect_async(url);
        let result = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect).await.map_err(|_| {
                TransportError::Connect(format!("handshake timed out after {:?}", timeout))
            })?,
            None => connect.await,
        };

        let (socket, _response) = result.map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(socket)
    }
}

#[async_trait]
impl Transport for TungsteniteTransport {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError> {
        let socket = self.handshake(url).await?;
        tracing::debug!(url, "WebSocket handshake complete");

        let (sink, stream) = socket.split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tokio::spawn(write_frames(sink, outbound_rx, events_tx.clone()));
        tokio::spawn(read_messages(stream, events_tx));

        Ok(TransportLink::new(outbound_tx, events_rx))
    }
}

/// Forward outbound frames until `Close` or until the channel lets go of
/// the sender.
async fn write_frames(
    mut sink: SplitSink<Socket, Message>,
    mut outbound: mpsc::UnboundedReceiver<OutboundFrame>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    while let Some(frame) = outbound.recv().await {
        match frame {
            OutboundFrame::Text(text) => {
                if let Err(e) = sink.send(Message::text(text)).await {
                    tracing::debug!("Send error, stopping writer: {}", e);
                    let _ = events.send(TransportEvent::Error(TransportError::Send(e.to_string())));
                    return;
                }
            }
            OutboundFrame::Close => break,
        }
    }

    // Sends a close frame and flushes.
    if let Err(e) = sink.close().await {
        tracing::trace!("Close handshake incomplete: {}", e);
    }
}

/// Translate socket messages into events. Always ends with `Closed`.
async fn read_messages(
    mut stream: SplitStream<Socket>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let reason = loop {
        let event = match stream.next().await {
            Some(Ok(Message::Text(text))) => TransportEvent::Text(text.as_str().to_owned()),
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => TransportEvent::Text(text),
                Err(_) => TransportEvent::Error(TransportError::Protocol(
                    "binary frame is not valid UTF-8".to_string(),
                )),
            },
            Some(Ok(Message::Close(frame))) => break close_reason(frame),
            // Protocol ping/pong are answered by tungstenite
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                tracing::debug!("Receive error: {}", e);
                let _ = events.send(TransportEvent::Error(TransportError::Protocol(e.to_string())));
                break CloseReason::new(None, e.to_string());
            }
            None => break CloseReason::transport_gone(),
        };

        if events.send(event).is_err() {
            // Channel dropped the link.
            return;
        }
    };

    let _ = events.send(TransportEvent::Closed(reason));
}

fn close_reason(frame: Option<CloseFrame>) -> CloseReason {
    match frame {
        Some(frame) => CloseReason::new(Some(u16::from(frame.code)), frame.reason.as_str()),
        None => CloseReason::new(None, ""),
    }
}
