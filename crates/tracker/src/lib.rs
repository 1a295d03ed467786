//! Device-side session logic: the local counter, reconciliation of peer
//! updates, and the observable displayed state.

use std::sync::Arc;

use shared::{
    domain::{DeviceKind, HydrationState, IntakePlan},
    error::SyncError,
    protocol::{StateUpdate, SyncEvent},
};
use sync_channel::SyncClient;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{info, warn};

mod animation;

pub use animation::{crossed_labels, FillAnimation, Label, ANIMATION_DURATION, FRAME_STEP};

/// One device's view of the shared hydration count.
///
/// The displayed state lives in a `watch` channel and is only ever replaced
/// wholesale, from exactly one place: the sync receive task. A button press
/// computes the next state and puts it on the channel; the display then
/// updates when the channel echoes the put back, the same round trip a
/// peer's update takes. Last write to arrive wins; there is no merge.
pub struct HydrationSession {
    kind: DeviceKind,
    plan: IntakePlan,
    sync: Arc<dyn SyncClient>,
    state: watch::Sender<HydrationState>,
    recv_task: JoinHandle<()>,
}

impl HydrationSession {
    /// Attach a session to a sync channel and start its receive task.
    /// State starts fresh; nothing survives a relaunch.
    pub fn start(kind: DeviceKind, sync: Arc<dyn SyncClient>, plan: IntakePlan) -> Self {
        let (state, _) = watch::channel(HydrationState::fresh(plan));
        let events = sync.subscribe();
        let recv_task = tokio::spawn(run_receive_loop(kind, events, state.clone()));
        Self {
            kind,
            plan,
            sync,
            state,
            recv_task,
        }
    }

    /// Watch the displayed state, like the UI does.
    pub fn subscribe(&self) -> watch::Receiver<HydrationState> {
        self.state.subscribe()
    }

    pub fn displayed(&self) -> HydrationState {
        *self.state.borrow()
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn plan(&self) -> IntakePlan {
        self.plan
    }

    /// One button press: compute the incremented state and fire it into the
    /// sync channel. The local display is not touched here; it updates when
    /// the channel delivers the change back.
    pub async fn press(&self) -> Result<(), SyncError> {
        let next = self.displayed().increment(self.plan);
        info!(
            device = self.kind.label(),
            drunk_ml = next.drunk_ml,
            remain_ml = next.remain_ml,
            "button press, sending state"
        );
        self.sync.put_state(StateUpdate::from(next)).await
    }
}

impl Drop for HydrationSession {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

async fn run_receive_loop(
    kind: DeviceKind,
    mut events: broadcast::Receiver<SyncEvent>,
    state: watch::Sender<HydrationState>,
) {
    loop {
        match events.recv().await {
            Ok(event) => apply_event(kind, &state, event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Best-effort channel: skipped deliveries are simply gone.
                warn!(device = kind.label(), skipped, "sync receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!(device = kind.label(), "sync channel closed, receive task ending");
                break;
            }
        }
    }
}

/// Reconcile one delivery: filter by path and event kind, then replace the
/// displayed state with the received one. Malformed payloads are logged and
/// dropped; there is no user-visible failure path.
fn apply_event(kind: DeviceKind, state: &watch::Sender<HydrationState>, event: SyncEvent) {
    if !event.is_state_change() {
        return;
    }
    match serde_json::from_str::<StateUpdate>(&event.payload) {
        Ok(update) => {
            let next = HydrationState::from(update);
            info!(
                device = kind.label(),
                source = event.source.0,
                drunk_ml = next.drunk_ml,
                "applied synced state"
            );
            state.send_replace(next);
        }
        Err(source) => {
            let err = SyncError::Decode {
                path: event.path,
                source,
            };
            warn!(device = kind.label(), error = %err, "dropped malformed state payload");
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
