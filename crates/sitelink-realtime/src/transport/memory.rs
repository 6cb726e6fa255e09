//! In-memory loopback transport for tests and single-process embedding.
//!
//! [`MemoryTransport`] implements [`Transport`]; the paired [`MemoryServer`]
//! handle plays the backend: it pushes events down the active link, records
//! every frame the client sends, and can script dial failures and link
//! drops.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use sitelink_core::{AppError, AppResult};

use crate::event::ServerEvent;

use super::{ClientFrame, Transport, TransportLink, TransportSink};

#[derive(Debug, Default)]
struct MemoryShared {
    /// Remaining dials to reject.
    fail_dials: AtomicU32,
    /// Total dial attempts observed.
    dial_count: AtomicU32,
    /// When set, sink sends are rejected.
    fail_sends: AtomicBool,
    /// Frames received from the client, in send order.
    frames: Mutex<Vec<ClientFrame>>,
    /// Sender half of the active link's event channel.
    current: Mutex<Option<mpsc::Sender<ServerEvent>>>,
}

/// Client-side half of the loopback pair.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    shared: Arc<MemoryShared>,
}

/// Backend-side half of the loopback pair.
#[derive(Debug, Clone)]
pub struct MemoryServer {
    shared: Arc<MemoryShared>,
}

impl MemoryTransport {
    /// Create a connected transport/server pair.
    pub fn new() -> (Self, MemoryServer) {
        let shared = Arc::new(MemoryShared::default());
        (
            Self {
                shared: shared.clone(),
            },
            MemoryServer { shared },
        )
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn dial(&self, _token: &str) -> AppResult<TransportLink> {
        self.shared.dial_count.fetch_add(1, Ordering::SeqCst);

        let remaining = self.shared.fail_dials.load(Ordering::SeqCst);
        if remaining > 0 {
            self.shared.fail_dials.store(remaining - 1, Ordering::SeqCst);
            return Err(AppError::transport("memory transport: scripted dial failure"));
        }

        let (tx, rx) = mpsc::channel(64);
        {
            let mut current = self
                .shared
                .current
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            *current = Some(tx);
        }

        Ok(TransportLink {
            sink: Box::new(MemorySink {
                shared: self.shared.clone(),
            }),
            events: rx,
        })
    }
}

struct MemorySink {
    shared: Arc<MemoryShared>,
}

#[async_trait]
impl TransportSink for MemorySink {
    async fn send(&self, frame: ClientFrame) -> AppResult<()> {
        if self.shared.fail_sends.load(Ordering::SeqCst) {
            return Err(AppError::send("memory transport: scripted send failure"));
        }
        self.shared
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame);
        Ok(())
    }

    async fn close(&self) {
        let mut current = self
            .shared
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *current = None;
    }
}

impl MemoryServer {
    /// Push an event to the active link. Returns `false` when no link is up.
    pub async fn push(&self, event: ServerEvent) -> bool {
        let tx = {
            let current = self
                .shared
                .current
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            current.clone()
        };
        match tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Drop the active link, simulating transport loss.
    pub fn drop_link(&self) {
        let mut current = self
            .shared
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *current = None;
    }

    /// Reject the next `n` dial attempts.
    pub fn fail_next_dials(&self, n: u32) {
        self.shared.fail_dials.store(n, Ordering::SeqCst);
    }

    /// Toggle scripted send failures.
    pub fn set_fail_sends(&self, fail: bool) {
        self.shared.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Total dial attempts observed so far.
    pub fn dial_count(&self) -> u32 {
        self.shared.dial_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every frame sent by the client.
    pub fn frames(&self) -> Vec<ClientFrame> {
        self.shared
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Clear the captured frame log.
    pub fn clear_frames(&self) {
        self.shared
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
