use serde::{Deserialize, Serialize};

/// Volume added per button press, in millilitres.
pub const STEP_ML: u32 = 250;
/// Daily intake goal, in millilitres.
pub const MAX_AMOUNT_ML: u32 = 2500;

/// Fill fraction at which the "drunk" label switches color.
pub const DRUNK_LABEL_THRESHOLD: f32 = 0.6;
/// Fill fraction at which the "remaining" label switches color.
pub const REMAIN_LABEL_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Phone,
    Wearable,
}

impl DeviceKind {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Phone => "phone",
            DeviceKind::Wearable => "wearable",
        }
    }
}

/// Step size and goal for a device session. Defaults match the stock app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakePlan {
    pub step_ml: u32,
    pub goal_ml: u32,
}

impl Default for IntakePlan {
    fn default() -> Self {
        Self {
            step_ml: STEP_ML,
            goal_ml: MAX_AMOUNT_ML,
        }
    }
}

/// The single entity in the system: a running intake count and its derived
/// fill fraction. Immutable; every transition produces a fresh value, and a
/// device only ever replaces its displayed state wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrationState {
    /// Volume consumed so far. Grows unbounded past the goal; only the
    /// derived fields saturate.
    pub drunk_ml: u32,
    /// Volume remaining, tracked as its own running subtraction, floored
    /// at zero.
    pub remain_ml: u32,
    /// `drunk_ml / goal`, capped at 1.0.
    pub percentage: f32,
}

impl Default for HydrationState {
    fn default() -> Self {
        Self {
            drunk_ml: 0,
            remain_ml: MAX_AMOUNT_ML,
            percentage: 0.0,
        }
    }
}

impl HydrationState {
    pub fn fresh(plan: IntakePlan) -> Self {
        Self {
            drunk_ml: 0,
            remain_ml: plan.goal_ml,
            percentage: 0.0,
        }
    }

    /// One button press: add a step, clamp the derived fields. Arithmetic is
    /// total; there is no failure path.
    pub fn increment(&self, plan: IntakePlan) -> Self {
        let drunk_ml = self.drunk_ml.saturating_add(plan.step_ml);
        let remain_ml = self.remain_ml.saturating_sub(plan.step_ml);
        let percentage = if plan.goal_ml == 0 {
            1.0
        } else {
            (drunk_ml as f32 / plan.goal_ml as f32).min(1.0)
        };
        Self {
            drunk_ml,
            remain_ml,
            percentage,
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.percentage >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_from_fresh_state() {
        let next = HydrationState::default().increment(IntakePlan::default());
        assert_eq!(next.drunk_ml, 250);
        assert_eq!(next.remain_ml, 2250);
        assert!((next.percentage - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn tenth_press_reaches_the_goal_exactly() {
        let plan = IntakePlan::default();
        let mut state = HydrationState::default();
        for _ in 0..10 {
            state = state.increment(plan);
        }
        assert_eq!(state.drunk_ml, 2500);
        assert_eq!(state.remain_ml, 0);
        assert_eq!(state.percentage, 1.0);
        assert!(state.goal_reached());
    }

    #[test]
    fn presses_past_the_goal_saturate_derived_fields_only() {
        let plan = IntakePlan::default();
        let mut state = HydrationState::default();
        for _ in 0..11 {
            state = state.increment(plan);
        }
        // drunk keeps growing; remain and percentage stay pinned.
        assert_eq!(state.drunk_ml, 2750);
        assert_eq!(state.remain_ml, 0);
        assert_eq!(state.percentage, 1.0);
    }

    #[test]
    fn increment_never_leaves_the_valid_range() {
        let plan = IntakePlan {
            step_ml: 333,
            goal_ml: 1000,
        };
        let mut state = HydrationState::fresh(plan);
        for _ in 0..50 {
            state = state.increment(plan);
            assert!(state.percentage >= 0.0 && state.percentage <= 1.0);
        }
        assert_eq!(state.remain_ml, 0);
    }

    #[test]
    fn zero_goal_pins_percentage() {
        let plan = IntakePlan {
            step_ml: 100,
            goal_ml: 0,
        };
        let state = HydrationState::fresh(plan).increment(plan);
        assert_eq!(state.percentage, 1.0);
    }
}
