//! Websocket client for the host platform API.
//!
//! One background IO task owns the socket. Callers hand it commands over
//! an mpsc channel; it assigns ids, writes frames, and routes `result`
//! frames to the waiting caller and `event` frames to subscriptions.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::connection::HostConnection;
use crate::error::ClientError;
use crate::protocol::{self, Incoming};
use crate::subscription::EventSubscription;

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<Ws, Message>;
type WsStream = SplitStream<Ws>;

type Reply = oneshot::Sender<Result<(u64, Value), ClientError>>;

enum Command {
    /// Send a frame and report its result (with the assigned id).
    Send {
        frame: Value,
        reply: Reply,
        events: Option<mpsc::UnboundedSender<Value>>,
    },
    /// Drop an event route and unsubscribe on the host.
    Release { subscription: u64 },
}

// ─── Connection handle ─────────────────────────────────────────────

/// Authenticated connection to the host. Cheap to share by reference;
/// dropping it stops the IO task.
pub struct WsConnection {
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    reply_timeout: Duration,
}

impl WsConnection {
    /// Connect to `url` and authenticate with a long-lived access token.
    pub async fn connect(url: &str, token: &str, reply_timeout: Duration) -> Result<Self, ClientError> {
        let (ws, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|source| ClientError::Connect {
                url: url.to_string(),
                source,
            })?;
        let (mut sink, mut stream) = ws.split();

        match tokio::time::timeout(reply_timeout, authenticate(&mut sink, &mut stream, token)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ClientError::Timeout {
                    what: "auth".into(),
                    secs: reply_timeout.as_secs(),
                });
            }
        }
        tracing::info!(url, "connected to host");

        let (commands, commands_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = IoTask {
            sink,
            stream,
            commands: commands_rx,
            cancel: cancel.clone(),
            next_id: 1,
            pending: HashMap::new(),
            routes: HashMap::new(),
        };
        tokio::spawn(task.run());

        Ok(Self {
            commands,
            cancel,
            reply_timeout,
        })
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    async fn request(
        &self,
        frame: Value,
        events: Option<mpsc::UnboundedSender<Value>>,
    ) -> Result<(u64, Value), ClientError> {
        let what = frame["type"].as_str().unwrap_or("command").to_string();
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Send { frame, reply, events })
            .map_err(|_| ClientError::Closed)?;

        match tokio::time::timeout(self.reply_timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ClientError::Closed),
            Err(_) => Err(ClientError::Timeout {
                what,
                secs: self.reply_timeout.as_secs(),
            }),
        }
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl HostConnection for WsConnection {
    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        return_response: bool,
    ) -> Result<Option<Value>, ClientError> {
        tracing::debug!(domain, service, return_response, "call_service");
        let frame = protocol::call_service(domain, service, data, return_response);
        let (_, result) = self.request(frame, None).await?;
        if !return_response {
            return Ok(None);
        }
        Ok(result.get("response").filter(|v| !v.is_null()).cloned())
    }

    async fn subscribe(&self, event_type: &str) -> Result<EventSubscription, ClientError> {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (id, _) = self
            .request(protocol::subscribe_events(event_type), Some(events))
            .await?;
        tracing::debug!(id, event_type, "subscribed");

        let commands = self.commands.clone();
        Ok(EventSubscription::new(id, event_type, events_rx, move |subscription| {
            let _ = commands.send(Command::Release { subscription });
        }))
    }

    async fn get_states(&self) -> Result<Value, ClientError> {
        let (_, states) = self.request(protocol::get_states(), None).await?;
        Ok(states)
    }
}

// ─── Handshake ─────────────────────────────────────────────────────

async fn authenticate(sink: &mut WsSink, stream: &mut WsStream, token: &str) -> Result<(), ClientError> {
    loop {
        let text = next_text(stream).await?;
        match protocol::parse_incoming(&text)? {
            Incoming::AuthRequired => {
                sink.send(Message::Text(protocol::auth(token).to_string())).await?;
            }
            Incoming::AuthOk => return Ok(()),
            Incoming::AuthInvalid { message } => {
                return Err(ClientError::Auth(
                    message.unwrap_or_else(|| "invalid access token".into()),
                ));
            }
            other => tracing::debug!(?other, "ignoring frame during auth"),
        }
    }
}

async fn next_text(stream: &mut WsStream) -> Result<String, ClientError> {
    while let Some(msg) = stream.next().await {
        match msg? {
            Message::Text(text) => return Ok(text),
            Message::Close(_) => return Err(ClientError::Closed),
            _ => {}
        }
    }
    Err(ClientError::Closed)
}

// ─── IO task ───────────────────────────────────────────────────────

struct IoTask {
    sink: WsSink,
    stream: WsStream,
    commands: mpsc::UnboundedReceiver<Command>,
    cancel: CancellationToken,
    next_id: u64,
    pending: HashMap<u64, Reply>,
    routes: HashMap<u64, mpsc::UnboundedSender<Value>>,
}

impl IoTask {
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("ws: connection dropped, stopping io task");
                    break;
                }
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    if let Err(e) = self.handle_command(cmd).await {
                        tracing::warn!("ws: write failed: {e}");
                        break;
                    }
                }
                msg = self.stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(orphan) = self.handle_text(&text) {
                                if let Err(e) = self.unsubscribe(orphan).await {
                                    tracing::warn!("ws: write failed: {e}");
                                    break;
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::info!("ws: host closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!("ws: read failed: {e}");
                            break;
                        }
                    }
                }
            }
        }

        for (_, reply) in self.pending.drain() {
            let _ = reply.send(Err(ClientError::Closed));
        }
        self.routes.clear();
        let _ = self.sink.close().await;
    }

    async fn handle_command(&mut self, cmd: Command) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        match cmd {
            Command::Send { frame, reply, events } => {
                // Callers that timed out have dropped their receivers.
                self.pending.retain(|_, waiting| !waiting.is_closed());
                let id = self.alloc_id();
                let text = protocol::with_id(frame, id).to_string();
                if let Some(events) = events {
                    self.routes.insert(id, events);
                }
                self.pending.insert(id, reply);
                self.sink.send(Message::Text(text)).await
            }
            Command::Release { subscription } => {
                if self.routes.remove(&subscription).is_none() {
                    return Ok(());
                }
                self.unsubscribe(subscription).await
            }
        }
    }

    async fn unsubscribe(&mut self, subscription: u64) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        let id = self.alloc_id();
        tracing::debug!(subscription, "unsubscribing");
        let frame = protocol::with_id(protocol::unsubscribe_events(subscription), id);
        self.sink.send(Message::Text(frame.to_string())).await
    }

    /// Route one frame. Returns a subscription id whose owner has gone
    /// away; the caller unsubscribes it on the host.
    fn handle_text(&mut self, text: &str) -> Option<u64> {
        match protocol::parse_incoming(text) {
            Ok(Incoming::Result {
                id,
                success,
                result,
                error,
            }) => {
                let outcome = if success {
                    Ok((id, result))
                } else {
                    self.routes.remove(&id);
                    let error = error.unwrap_or_default();
                    Err(ClientError::Host {
                        code: error.code,
                        message: error.message,
                    })
                };
                let delivered = match self.pending.remove(&id) {
                    Some(reply) => reply.send(outcome).is_ok(),
                    None => {
                        tracing::debug!(id, "ws: result for untracked command");
                        false
                    }
                };
                // A subscribe acknowledged after its caller gave up.
                if !delivered && self.routes.remove(&id).is_some() {
                    tracing::debug!(id, "ws: subscription acknowledged after caller left");
                    return Some(id);
                }
                None
            }
            Ok(Incoming::Event { id, event }) => {
                let delivered = self.routes.get(&id).map(|route| route.send(event.data).is_ok());
                match delivered {
                    Some(true) => None,
                    Some(false) => {
                        self.routes.remove(&id);
                        Some(id)
                    }
                    None => {
                        tracing::debug!(id, event_type = %event.event_type, "ws: event without route");
                        None
                    }
                }
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("ws: undecodable frame: {e}");
                None
            }
        }
    }
}
