//! Connection manager: owns the single live link, the event bus, room
//! membership, and the reconnect loop.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock as StdRwLock};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use sitelink_core::config::realtime::RealtimeConfig;
use sitelink_core::events::OutgoingMessage;
use sitelink_core::traits::auth::AuthProvider;
use sitelink_core::types::id::{ConversationId, ProjectId};
use sitelink_core::{AppError, AppResult};

use crate::bus::{EventBus, Subscription};
use crate::event::{EventKind, ServerEvent};
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::presence::tracker::PresenceTracker;
use crate::transport::{ClientFrame, Transport, TransportLink, TransportSink};

use super::backoff::ReconnectPolicy;
use super::rooms::{RoomId, RoomMembership};
use super::state::ConnectionStatus;

type SharedSink = Arc<RwLock<Option<Arc<dyn TransportSink>>>>;

/// Manages exactly one authenticated real-time connection.
///
/// Cheap to clone; all clones share the same link, bus, and state. The
/// manager is explicitly constructed with its transport and auth
/// collaborators, so tests can run any number of isolated instances.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    config: RealtimeConfig,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
    bus: EventBus,
    presence: Arc<PresenceTracker>,
    rooms: RoomMembership,
    metrics: Arc<EngineMetrics>,
    status: StdRwLock<ConnectionStatus>,
    reconnect_attempts: AtomicU32,
    sink: SharedSink,
    /// Cancellation token for the current connect/disconnect cycle.
    cycle: StdMutex<CancellationToken>,
    /// Fire-and-forget frame queue (joins, leaves, typing signals).
    outbox: mpsc::UnboundedSender<ClientFrame>,
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("status", &self.status())
            .field("rooms", &self.inner.rooms.len())
            .finish_non_exhaustive()
    }
}

impl ConnectionManager {
    /// Create a manager over the given transport and auth provider.
    ///
    /// Must be called within a Tokio runtime; the manager spawns its
    /// outbox writer task immediately.
    pub fn new(
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
        config: RealtimeConfig,
    ) -> Self {
        let (outbox, outbox_rx) = mpsc::unbounded_channel();
        let sink: SharedSink = Arc::new(RwLock::new(None));
        tokio::spawn(run_writer(sink.clone(), outbox_rx));

        Self {
            inner: Arc::new(ManagerInner {
                config,
                transport,
                auth,
                bus: EventBus::new(),
                presence: Arc::new(PresenceTracker::new()),
                rooms: RoomMembership::new(),
                metrics: Arc::new(EngineMetrics::default()),
                status: StdRwLock::new(ConnectionStatus::Disconnected),
                reconnect_attempts: AtomicU32::new(0),
                sink,
                cycle: StdMutex::new(CancellationToken::new()),
                outbox,
            }),
        }
    }

    /// Establish the connection.
    ///
    /// No-op while a connection or reconnect cycle is already active.
    /// Returns an error only when unauthenticated; transport failures are
    /// absorbed by the backoff retry loop and surfaced as
    /// [`ServerEvent::ReconnectAttempt`] events.
    pub async fn connect(&self) -> AppResult<()> {
        {
            let mut status = self
                .inner
                .status
                .write()
                .unwrap_or_else(|e| e.into_inner());
            if status.is_active() {
                debug!(status = status.as_str(), "connect() ignored, already active");
                return Ok(());
            }
            if !self.inner.auth.is_authenticated() {
                return Err(AppError::authentication(
                    "Cannot connect without an authenticated session",
                ));
            }
            *status = ConnectionStatus::Connecting;
        }

        let token = match self.inner.auth.bearer_token() {
            Some(token) => token,
            None => {
                self.inner.set_status(ConnectionStatus::Disconnected);
                return Err(AppError::authentication("No bearer token available"));
            }
        };

        let cycle = self.inner.new_cycle();
        match dial_once(&self.inner, &token).await {
            Ok(link) => {
                // A disconnect() issued during the dial wins; the late link
                // must not be installed.
                if cycle.is_cancelled() {
                    link.sink.close().await;
                    return Ok(());
                }
                install_link(&self.inner, link, &cycle).await;
                self.inner.set_status(ConnectionStatus::Connected);
                self.inner.metrics.record_connect();
                info!("Real-time connection established");
                self.inner.bus.dispatch(&ServerEvent::Connected);
            }
            Err(e) => {
                if cycle.is_cancelled() {
                    return Ok(());
                }
                warn!(error = %e, "Initial dial failed, entering reconnect loop");
                self.inner.set_status(ConnectionStatus::Reconnecting);
                tokio::spawn(run_reconnect(self.inner.clone(), cycle));
            }
        }
        Ok(())
    }

    /// Tear down the connection unconditionally.
    ///
    /// Clears all room memberships and presence state; stale presence must
    /// not be trusted after a drop. Emits [`ServerEvent::Disconnected`].
    pub async fn disconnect(&self) {
        {
            let mut status = self
                .inner
                .status
                .write()
                .unwrap_or_else(|e| e.into_inner());
            if *status == ConnectionStatus::Disconnected {
                return;
            }
            *status = ConnectionStatus::Disconnected;
        }

        self.inner.cancel_cycle();
        let sink = self.inner.sink.write().await.take();
        if let Some(sink) = sink {
            sink.close().await;
        }
        self.inner.rooms.clear();
        self.inner.presence.clear();
        self.inner.reconnect_attempts.store(0, Ordering::Relaxed);
        info!("Real-time connection closed");
        self.inner.bus.dispatch(&ServerEvent::Disconnected);
    }

    /// Register a handler for an event kind. Dropping the returned
    /// [`Subscription`] unsubscribes.
    pub fn on(
        &self,
        kind: EventKind,
        handler: impl Fn(&ServerEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.bus.subscribe(kind, handler)
    }

    /// Join a project room. Idempotent.
    pub fn join_project(&self, project_id: ProjectId) {
        self.join_room(RoomId::Project(project_id));
    }

    /// Leave a project room. No-op when not joined.
    pub fn leave_project(&self, project_id: ProjectId) {
        self.leave_room(RoomId::Project(project_id));
    }

    /// Join a conversation room. Idempotent.
    pub fn join_conversation(&self, conversation_id: ConversationId) {
        self.join_room(RoomId::Conversation(conversation_id));
    }

    /// Leave a conversation room. No-op when not joined.
    pub fn leave_conversation(&self, conversation_id: ConversationId) {
        self.leave_room(RoomId::Conversation(conversation_id));
    }

    fn join_room(&self, room: RoomId) {
        if self.inner.rooms.join(room) {
            debug!(room = %room.channel_name(), "Joining room");
            let _ = self.inner.outbox.send(ClientFrame::Join {
                room: room.channel_name(),
            });
        }
    }

    fn leave_room(&self, room: RoomId) {
        if self.inner.rooms.leave(room) {
            debug!(room = %room.channel_name(), "Leaving room");
            let _ = self.inner.outbox.send(ClientFrame::Leave {
                room: room.channel_name(),
            });
        }
    }

    /// Publish a chat message.
    ///
    /// Resolves on transport-level delivery acknowledgment, bounded by the
    /// configured send timeout. Failures are logged once and returned to
    /// the caller; there is no automatic retry, since a duplicate send is
    /// worse than a dropped message here.
    pub async fn send_message(&self, message: OutgoingMessage) -> AppResult<()> {
        let sink = self
            .inner
            .sink
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::transport("Cannot send message while disconnected"))?;

        let deadline = Duration::from_secs(self.inner.config.send_timeout_seconds);
        match timeout(deadline, sink.send(ClientFrame::Message { payload: message })).await {
            Ok(Ok(())) => {
                self.inner.metrics.record_send();
                Ok(())
            }
            Ok(Err(e)) => {
                self.inner.metrics.record_send_failure();
                error!(error = %e, "Message send rejected by transport");
                Err(e)
            }
            Err(_) => {
                self.inner.metrics.record_send_failure();
                error!("Message delivery acknowledgment timed out");
                Err(AppError::timeout("Message delivery acknowledgment timed out"))
            }
        }
    }

    /// Signal that the local user started typing. Best-effort; dropped
    /// packets are acceptable for advisory indicators.
    pub fn start_typing(&self, conversation_id: ConversationId) {
        let _ = self.inner.outbox.send(ClientFrame::Typing {
            conversation_id,
            is_typing: true,
        });
    }

    /// Signal that the local user stopped typing. Best-effort.
    pub fn stop_typing(&self, conversation_id: ConversationId) {
        let _ = self.inner.outbox.send(ClientFrame::Typing {
            conversation_id,
            is_typing: false,
        });
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self
            .inner
            .status
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Reconnect attempts made since the link was last lost.
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.reconnect_attempts.load(Ordering::Relaxed)
    }

    /// The presence tracker fed by this connection.
    pub fn presence(&self) -> &Arc<PresenceTracker> {
        &self.inner.presence
    }

    /// The engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.inner.config
    }

    /// Number of rooms currently held.
    pub fn joined_room_count(&self) -> usize {
        self.inner.rooms.len()
    }

    /// Copy of the engine counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

impl ManagerInner {
    fn set_status(&self, next: ConnectionStatus) {
        let mut status = self.status.write().unwrap_or_else(|e| e.into_inner());
        if *status != next && !status.can_transition(next) {
            warn!(
                from = status.as_str(),
                to = next.as_str(),
                "Unexpected connection status transition"
            );
        }
        *status = next;
    }

    /// Replace the cycle token, cancelling nothing. Called at connect time.
    fn new_cycle(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut cycle = self.cycle.lock().unwrap_or_else(|e| e.into_inner());
        *cycle = token.clone();
        token
    }

    /// Cancel the current cycle's reader and reconnect tasks.
    fn cancel_cycle(&self) {
        let cycle = self.cycle.lock().unwrap_or_else(|e| e.into_inner());
        cycle.cancel();
    }

    /// Apply an inbound event to engine-owned state, then fan out.
    fn route(&self, event: &ServerEvent) {
        self.metrics.record_event();
        if let ServerEvent::PresenceChange {
            user_id,
            status,
            timestamp,
        } = event
        {
            self.presence.apply(*user_id, *status, *timestamp);
        }
        self.bus.dispatch(event);
    }
}

/// Bounded dial of a single link.
async fn dial_once(inner: &Arc<ManagerInner>, token: &str) -> AppResult<TransportLink> {
    let deadline = Duration::from_secs(inner.config.connect_timeout_seconds);
    match timeout(deadline, inner.transport.dial(token)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout("Connection attempt timed out")),
    }
}

/// Install a freshly dialed link: store the sink, re-issue joins for every
/// held room, and start the reader.
async fn install_link(inner: &Arc<ManagerInner>, link: TransportLink, cycle: &CancellationToken) {
    let sink: Arc<dyn TransportSink> = Arc::from(link.sink);
    *inner.sink.write().await = Some(sink);

    for room in inner.rooms.snapshot() {
        let _ = inner.outbox.send(ClientFrame::Join {
            room: room.channel_name(),
        });
    }

    tokio::spawn(run_reader(inner.clone(), link.events, cycle.clone()));
}

/// Pump inbound events into the engine until the link drops or the cycle
/// is cancelled. An uncancelled drop triggers the reconnect loop.
async fn run_reader(
    inner: Arc<ManagerInner>,
    mut events: mpsc::Receiver<ServerEvent>,
    cycle: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cycle.cancelled() => return,
            event = events.recv() => match event {
                Some(event) => inner.route(&event),
                None => break,
            },
        }
    }

    if cycle.is_cancelled() {
        return;
    }

    warn!("Transport link lost, scheduling reconnect");
    *inner.sink.write().await = None;
    inner.presence.clear();
    inner.set_status(ConnectionStatus::Reconnecting);
    tokio::spawn(run_reconnect(inner, cycle));
}

/// Backoff retry loop. Emits `reconnect_attempt` per try and `reconnected`
/// on recovery; stops silently when the cycle is cancelled and tears down
/// when the credential disappears mid-retry.
///
/// Returns a boxed future: the loop awaits `install_link`, which spawns
/// `run_reader`, which spawns this loop again. Boxing here breaks that
/// cycle of opaque future types so each spawn point can prove `Send`.
fn run_reconnect(inner: Arc<ManagerInner>, cycle: CancellationToken) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        let policy = ReconnectPolicy::from_config(&inner.config);

        loop {
            if cycle.is_cancelled() {
                return;
            }

            let attempt = inner.reconnect_attempts.fetch_add(1, Ordering::Relaxed) + 1;
            inner.metrics.record_reconnect_attempt();
            inner.bus.dispatch(&ServerEvent::ReconnectAttempt { attempt });

            let delay = policy.delay(attempt);
            tokio::select! {
                _ = cycle.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let token = if inner.auth.is_authenticated() {
                inner.auth.bearer_token()
            } else {
                None
            };
            let token = match token {
                Some(token) => token,
                None => {
                    info!("Session ended during reconnect, giving up");
                    inner.set_status(ConnectionStatus::Disconnected);
                    inner.rooms.clear();
                    inner.presence.clear();
                    inner.reconnect_attempts.store(0, Ordering::Relaxed);
                    inner.bus.dispatch(&ServerEvent::Disconnected);
                    return;
                }
            };

            match dial_once(&inner, &token).await {
                Ok(link) => {
                    // A disconnect() issued during the dial wins.
                    if cycle.is_cancelled() {
                        link.sink.close().await;
                        return;
                    }
                    install_link(&inner, link, &cycle).await;
                    inner.reconnect_attempts.store(0, Ordering::Relaxed);
                    inner.set_status(ConnectionStatus::Connected);
                    inner.metrics.record_connect();
                    info!(attempts = attempt, "Real-time connection recovered");
                    inner.bus.dispatch(&ServerEvent::Reconnected);
                    return;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Reconnect dial failed");
                }
            }
        }
    })
}

/// Drains the fire-and-forget outbox into whichever sink is current.
/// Frames queued while offline are dropped; room joins are replayed from
/// the membership set on reconnect instead.
async fn run_writer(sink: SharedSink, mut outbox: mpsc::UnboundedReceiver<ClientFrame>) {
    while let Some(frame) = outbox.recv().await {
        let current = sink.read().await.clone();
        match current {
            Some(sink) => {
                if let Err(e) = sink.send(frame).await {
                    warn!(error = %e, "Control frame send failed");
                }
            }
            None => trace!("Dropping control frame while offline"),
        }
    }
}
