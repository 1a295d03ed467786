use serde::{Deserialize, Serialize};

use crate::domain::{DeviceId, HydrationState};

/// Key-value path the state payload is published under. Receivers filter on
/// path equality and ignore everything else.
pub const STATE_PATH: &str = "/state";

/// Wire form of [`HydrationState`]. Field names are the data-map keys the
/// companion apps already use, so a payload round-trips byte-for-byte
/// against them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(rename = "DRUNK")]
    pub drunk_ml: u32,
    #[serde(rename = "REMAIN")]
    pub remain_ml: u32,
    #[serde(rename = "PERCENTAGE")]
    pub percentage: f32,
}

impl From<HydrationState> for StateUpdate {
    fn from(state: HydrationState) -> Self {
        Self {
            drunk_ml: state.drunk_ml,
            remain_ml: state.remain_ml,
            percentage: state.percentage,
        }
    }
}

impl From<StateUpdate> for HydrationState {
    fn from(update: StateUpdate) -> Self {
        Self {
            drunk_ml: update.drunk_ml,
            remain_ml: update.remain_ml,
            percentage: update.percentage,
        }
    }
}

/// Mirrors the platform's data-event types; only `Changed` on the state
/// path is ever reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEventKind {
    Changed,
    Deleted,
}

/// One delivery from the sync channel. The payload stays opaque JSON text
/// until a session decodes it, so a malformed peer payload surfaces as a
/// decode error at the receiver rather than poisoning the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub source: DeviceId,
    pub path: String,
    pub kind: SyncEventKind,
    pub payload: String,
}

impl SyncEvent {
    pub fn is_state_change(&self) -> bool {
        self.kind == SyncEventKind::Changed && self.path == STATE_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IntakePlan;

    #[test]
    fn payload_uses_the_data_map_keys() {
        let update = StateUpdate {
            drunk_ml: 250,
            remain_ml: 2250,
            percentage: 0.1,
        };
        let json = serde_json::to_string(&update).expect("encode");
        assert!(json.contains("\"DRUNK\":250"));
        assert!(json.contains("\"REMAIN\":2250"));
        assert!(json.contains("\"PERCENTAGE\""));
    }

    #[test]
    fn round_trip_reconstructs_identical_fields() {
        let state = HydrationState::default()
            .increment(IntakePlan::default())
            .increment(IntakePlan::default());
        let update = StateUpdate::from(state);
        let json = serde_json::to_string(&update).expect("encode");
        let decoded: StateUpdate = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, update);
        assert_eq!(HydrationState::from(decoded), state);
    }

    #[test]
    fn only_changed_events_on_the_state_path_count() {
        let payload = String::from("{}");
        let event = SyncEvent {
            source: DeviceId(1),
            path: STATE_PATH.to_string(),
            kind: SyncEventKind::Changed,
            payload: payload.clone(),
        };
        assert!(event.is_state_change());

        let deleted = SyncEvent {
            kind: SyncEventKind::Deleted,
            ..event.clone()
        };
        assert!(!deleted.is_state_change());

        let wrong_path = SyncEvent {
            path: "/settings".to_string(),
            ..event
        };
        assert!(!wrong_path.is_state_change());
    }
}
