//! WebSocket channel for live room updates
//!
//! A single channel connection is shared across every room a client
//! visits in one session; one room subscription is active at a time.
//! The connection task owns the socket, reconnects with bounded
//! backoff, and re-announces room membership after every reconnect --
//! membership never survives a transport drop implicitly.
//!
//! Events missed while disconnected are lost; there is no replay.
//! Consumers re-fetch authoritative room state through the directory
//! after a reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use podium_core::ClientConfig;

use crate::dispatch::{Dispatcher, EventKind, Handler, HandlerId};
use crate::error::{Error, Result};
use crate::protocol::{ClientMessage, ServerMessage, TurnEvent};

/// First reconnect delay; doubles per failed attempt
const INITIAL_BACKOFF_MS: u64 = 250;

/// Reconnect delay ceiling
const MAX_BACKOFF_MS: u64 = 15_000;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport and not trying (initial, or after `close`)
    Disconnected,
    /// Establishing the transport (includes reconnect attempts)
    Connecting,
    /// Transport open, no acknowledged room subscription
    Connected,
    /// Room subscription acknowledged by the server
    Joined,
}

/// Event delivered to registered handlers
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Transport established (or re-established)
    Connect,
    /// Transport lost; the channel keeps reconnecting
    Disconnect,
    /// Room subscription acknowledged
    Joined { room_id: Uuid },
    /// A turn was judged and broadcast
    NewTurn(TurnEvent),
    /// Another participant joined the room
    ParticipantJoined {
        room_id: Uuid,
        user_id: Uuid,
        username: Option<String>,
    },
}

impl ChannelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChannelEvent::Connect => EventKind::Connect,
            ChannelEvent::Disconnect => EventKind::Disconnect,
            ChannelEvent::Joined { .. } => EventKind::Joined,
            ChannelEvent::NewTurn(_) => EventKind::NewTurn,
            ChannelEvent::ParticipantJoined { .. } => EventKind::ParticipantJoined,
        }
    }
}

enum Command {
    Join(Uuid),
    Leave(Uuid),
    Close,
}

struct ChannelState {
    connection: ConnectionState,
    /// The one room whose events are routed to handlers
    active_room: Option<Uuid>,
}

struct Inner {
    ws_url: String,
    state: RwLock<ChannelState>,
    /// Connectivity flag: false during a disconnected window
    connected: AtomicBool,
    /// Whether the connection task is running
    running: AtomicBool,
    dispatcher: StdMutex<Dispatcher>,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: StdMutex<Option<mpsc::Receiver<Command>>>,
}

impl Inner {
    /// Invoke every handler registered for the event's kind.
    /// Runs on the connection task, so handlers for one connection are
    /// never executed concurrently. The handler list is snapshotted
    /// first so handlers may register/deregister reentrantly.
    fn emit(&self, event: &ChannelEvent) {
        let handlers: Vec<Handler> = {
            let dispatcher = self.dispatcher.lock().expect("dispatcher lock poisoned");
            dispatcher.snapshot(event.kind())
        };
        for handler in handlers {
            handler(event);
        }
    }

    async fn set_connection(&self, connection: ConnectionState) {
        self.state.write().await.connection = connection;
    }
}

/// Handle to the live update channel.
///
/// Explicitly constructed and cheap to clone; the embedding
/// application creates one at startup and closes it at exit.
#[derive(Clone)]
pub struct LiveChannel {
    inner: Arc<Inner>,
}

impl LiveChannel {
    pub fn new(config: &ClientConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let ws_url = format!("{}/ws", config.ws_url.trim_end_matches('/'));

        Self {
            inner: Arc::new(Inner {
                ws_url,
                state: RwLock::new(ChannelState {
                    connection: ConnectionState::Disconnected,
                    active_room: None,
                }),
                connected: AtomicBool::new(false),
                running: AtomicBool::new(false),
                dispatcher: StdMutex::new(Dispatcher::default()),
                cmd_tx,
                cmd_rx: StdMutex::new(Some(cmd_rx)),
            }),
        }
    }

    /// Start the connection task. Idempotent: calling on a live
    /// channel is a no-op.
    pub async fn connect(&self) -> Result<()> {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!("connect() on a live channel, reusing connection");
            return Ok(());
        }

        let cmd_rx = {
            let mut slot = self.inner.cmd_rx.lock().expect("cmd_rx lock poisoned");
            match slot.take() {
                Some(rx) => rx,
                None => {
                    // A closed channel cannot be revived
                    self.inner.running.store(false, Ordering::SeqCst);
                    return Err(Error::ChannelClosed);
                }
            }
        };

        self.inner.set_connection(ConnectionState::Connecting).await;
        info!(url = %self.inner.ws_url, "Connecting live channel");

        let inner = self.inner.clone();
        tokio::spawn(connection_task(inner, cmd_rx));
        Ok(())
    }

    /// Subscribe to a room's events. Requires `connect` first.
    /// Idempotent for the active room; joining a different room
    /// without leaving first auto-leaves the previous one.
    pub async fn join_room(&self, room_id: Uuid) -> Result<()> {
        if !self.inner.running.load(Ordering::SeqCst) {
            return Err(Error::ChannelDisconnected);
        }

        let previous = {
            let mut s = self.inner.state.write().await;
            if s.active_room == Some(room_id) {
                debug!(room_id = %room_id, "join_room for the active room, ignoring");
                return Ok(());
            }
            let previous = s.active_room.take();
            s.active_room = Some(room_id);
            previous
        };

        if let Some(prev) = previous {
            warn!(
                previous = %prev,
                new = %room_id,
                "join_room without leave_room, auto-leaving previous room"
            );
            self.send(Command::Leave(prev)).await?;
        }

        self.send(Command::Join(room_id)).await
    }

    /// Unsubscribe from a room. After this returns, no further events
    /// for that room reach handlers, even while the transport stays
    /// open.
    pub async fn leave_room(&self, room_id: Uuid) -> Result<()> {
        if !self.inner.running.load(Ordering::SeqCst) {
            return Err(Error::ChannelDisconnected);
        }

        {
            let mut s = self.inner.state.write().await;
            if s.active_room != Some(room_id) {
                warn!(room_id = %room_id, "leave_room for a room that is not active");
                return Ok(());
            }
            s.active_room = None;
        }
        self.send(Command::Leave(room_id)).await
    }

    /// Register a handler for an event kind. Multiple handlers per
    /// kind are supported; each gets its own id.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> HandlerId
    where
        F: Fn(&ChannelEvent) + Send + Sync + 'static,
    {
        let mut dispatcher = self
            .inner
            .dispatcher
            .lock()
            .expect("dispatcher lock poisoned");
        dispatcher.on(kind, Arc::new(handler))
    }

    /// Deregister one handler; others for the same kind are untouched
    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        let mut dispatcher = self
            .inner
            .dispatcher
            .lock()
            .expect("dispatcher lock poisoned");
        dispatcher.off(kind, id)
    }

    /// Connectivity flag: flips false on transport loss, true again
    /// after reconnect
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> ConnectionState {
        self.inner.state.read().await.connection
    }

    pub async fn active_room(&self) -> Option<Uuid> {
        self.inner.state.read().await.active_room
    }

    /// Tear the channel down for good (process exit path)
    pub async fn close(&self) {
        let _ = self.inner.cmd_tx.send(Command::Close).await;
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        self.inner
            .cmd_tx
            .send(cmd)
            .await
            .map_err(|_| Error::ChannelClosed)
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Main connection task: connect, serve, reconnect with backoff
async fn connection_task(inner: Arc<Inner>, mut cmd_rx: mpsc::Receiver<Command>) {
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        inner.set_connection(ConnectionState::Connecting).await;

        let ws = match tokio_tungstenite::connect_async(inner.ws_url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                debug!(error = %e, backoff_ms, "Channel connect failed, retrying");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                continue;
            }
        };

        backoff_ms = INITIAL_BACKOFF_MS;
        inner.connected.store(true, Ordering::SeqCst);
        inner.set_connection(ConnectionState::Connected).await;
        inner.emit(&ChannelEvent::Connect);
        info!("Live channel connected");

        match serve_connection(&inner, ws, &mut cmd_rx).await {
            ServeOutcome::Closed => {
                inner.connected.store(false, Ordering::SeqCst);
                inner.running.store(false, Ordering::SeqCst);
                inner.set_connection(ConnectionState::Disconnected).await;
                inner.emit(&ChannelEvent::Disconnect);
                info!("Live channel closed");
                return;
            }
            ServeOutcome::TransportLost => {
                inner.connected.store(false, Ordering::SeqCst);
                inner.emit(&ChannelEvent::Disconnect);
                warn!("Live channel transport lost, reconnecting");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
            }
        }
    }
}

enum ServeOutcome {
    /// Explicit close, no reconnect
    Closed,
    /// Transport failure, reconnect with backoff
    TransportLost,
}

/// Serve one established transport until it drops or the channel is
/// closed
async fn serve_connection(
    inner: &Arc<Inner>,
    ws: WsStream,
    cmd_rx: &mut mpsc::Receiver<Command>,
) -> ServeOutcome {
    let (mut ws_tx, mut ws_rx) = ws.split();

    // Re-announce membership: subscriptions do not survive reconnects.
    // `announced` tracks the join sent on THIS transport, so repeated
    // join commands never produce duplicate subscription frames.
    let mut announced: Option<Uuid> = None;
    if let Some(room_id) = inner.state.read().await.active_room {
        debug!(room_id = %room_id, "Re-announcing room membership");
        if send_message(&mut ws_tx, &ClientMessage::JoinRoom { room_id })
            .await
            .is_err()
        {
            return ServeOutcome::TransportLost;
        }
        announced = Some(room_id);
    }

    loop {
        tokio::select! {
            // Incoming frame from the server
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match ServerMessage::from_json(&text) {
                            Ok(msg) => handle_server_message(inner, msg).await,
                            Err(e) => warn!(error = %e, "Undecodable channel frame"),
                        }
                    }
                    Some(Ok(WsMessage::Ping(payload))) => {
                        if ws_tx.send(WsMessage::Pong(payload)).await.is_err() {
                            return ServeOutcome::TransportLost;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        debug!("Server closed the transport");
                        return ServeOutcome::TransportLost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Transport read error");
                        return ServeOutcome::TransportLost;
                    }
                }
            }

            // Outgoing command
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Join(room_id)) => {
                        if announced == Some(room_id) {
                            debug!(room_id = %room_id, "Join already announced on this transport");
                            continue;
                        }
                        if send_message(&mut ws_tx, &ClientMessage::JoinRoom { room_id })
                            .await
                            .is_err()
                        {
                            return ServeOutcome::TransportLost;
                        }
                        announced = Some(room_id);
                    }
                    Some(Command::Leave(room_id)) => {
                        if announced == Some(room_id) {
                            announced = None;
                        }
                        if send_message(&mut ws_tx, &ClientMessage::LeaveRoom { room_id })
                            .await
                            .is_err()
                        {
                            return ServeOutcome::TransportLost;
                        }
                        // Back to room-less transport state
                        let mut s = inner.state.write().await;
                        if s.connection == ConnectionState::Joined {
                            s.connection = ConnectionState::Connected;
                        }
                    }
                    Some(Command::Close) | None => {
                        let _ = ws_tx.send(WsMessage::Close(None)).await;
                        return ServeOutcome::Closed;
                    }
                }
            }
        }
    }
}

async fn send_message(
    ws_tx: &mut (impl Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin),
    msg: &ClientMessage,
) -> Result<()> {
    let json = msg.to_json().map_err(|e| Error::Protocol(e.to_string()))?;
    ws_tx.send(WsMessage::Text(json)).await?;
    Ok(())
}

/// Route a server message to handlers, filtering on the active room.
/// Events for a room the client has left (or never joined) are
/// dropped here, which is what makes `leave_room` take effect even
/// while the transport stays open.
async fn handle_server_message(inner: &Arc<Inner>, msg: ServerMessage) {
    match msg {
        ServerMessage::Joined { room_id } => {
            let is_active = {
                let mut s = inner.state.write().await;
                if s.active_room == Some(room_id) {
                    s.connection = ConnectionState::Joined;
                    true
                } else {
                    false
                }
            };
            if is_active {
                info!(room_id = %room_id, "Room subscription acknowledged");
                inner.emit(&ChannelEvent::Joined { room_id });
            } else {
                debug!(room_id = %room_id, "Joined ack for non-active room, dropping");
            }
        }
        ServerMessage::NewTurn(turn) => {
            let active = inner.state.read().await.active_room;
            if active == Some(turn.room_id) {
                inner.emit(&ChannelEvent::NewTurn(turn));
            } else {
                debug!(room_id = %turn.room_id, "Turn for non-active room, dropping");
            }
        }
        ServerMessage::ParticipantJoined {
            room_id,
            user_id,
            username,
        } => {
            let active = inner.state.read().await.active_room;
            if active == Some(room_id) {
                inner.emit(&ChannelEvent::ParticipantJoined {
                    room_id,
                    user_id,
                    username,
                });
            }
        }
        ServerMessage::Pong => {
            debug!("Received pong");
        }
        ServerMessage::Error { message } => {
            warn!(message = %message, "Server reported channel error");
        }
    }
}
