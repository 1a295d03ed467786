//! The platform key-value sync transport behind a trait seam.
//!
//! The real transport is an external best-effort replication service; devices
//! consume it only through [`SyncClient`]. [`LoopbackHub`] is the in-process
//! implementation used by the simulator and tests. It reproduces the two
//! behaviors sessions depend on: a put fans out to every attached device,
//! including the sender, and a payload identical to the last one on the same
//! path produces no event at all.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use shared::{
    domain::DeviceId,
    error::SyncError,
    protocol::{StateUpdate, SyncEvent, SyncEventKind, STATE_PATH},
};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

const EVENT_BUFFER: usize = 64;

/// Device-side handle to the sync channel. Sends are one-shot "urgent"
/// messages with no delivery confirmation.
#[async_trait]
pub trait SyncClient: Send + Sync {
    async fn put_state(&self, update: StateUpdate) -> Result<(), SyncError>;
    fn subscribe(&self) -> broadcast::Receiver<SyncEvent>;
    fn device_id(&self) -> DeviceId;
}

/// In-process stand-in for the platform replication service.
pub struct LoopbackHub {
    events: broadcast::Sender<SyncEvent>,
    next_device: AtomicI64,
    last_payload: Mutex<HashMap<String, String>>,
}

impl LoopbackHub {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Arc::new(Self {
            events,
            next_device: AtomicI64::new(1),
            last_payload: Mutex::new(HashMap::new()),
        })
    }

    /// Hand out a client handle with a fresh device id.
    pub fn attach(self: &Arc<Self>) -> LoopbackSync {
        let device_id = DeviceId(self.next_device.fetch_add(1, Ordering::Relaxed));
        LoopbackSync {
            device_id,
            hub: Arc::clone(self),
        }
    }

    async fn publish(&self, source: DeviceId, path: &str, payload: String) -> Result<(), SyncError> {
        {
            let mut last = self.last_payload.lock().await;
            if last.get(path) == Some(&payload) {
                debug!(path, "unchanged payload, no event emitted");
                return Ok(());
            }
            last.insert(path.to_string(), payload.clone());
        }

        let event = SyncEvent {
            source,
            path: path.to_string(),
            kind: SyncEventKind::Changed,
            payload,
        };
        // Fire-and-forget: a put with nobody listening is simply dropped.
        if self.events.send(event).is_err() {
            debug!(path, "no attached receivers, put dropped");
        }
        Ok(())
    }
}

pub struct LoopbackSync {
    device_id: DeviceId,
    hub: Arc<LoopbackHub>,
}

#[async_trait]
impl SyncClient for LoopbackSync {
    async fn put_state(&self, update: StateUpdate) -> Result<(), SyncError> {
        let payload = serde_json::to_string(&update).map_err(|source| SyncError::Encode {
            path: STATE_PATH.to_string(),
            source,
        })?;
        self.hub.publish(self.device_id, STATE_PATH, payload).await
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.hub.events.subscribe()
    }

    fn device_id(&self) -> DeviceId {
        self.device_id
    }
}
