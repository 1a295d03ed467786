//! Pure interpolation for the water-level visual. Frames are plain numbers;
//! whatever renders the gauge decides how to consume them.

use std::time::Duration;

use shared::domain::{DRUNK_LABEL_THRESHOLD, REMAIN_LABEL_THRESHOLD};

pub const ANIMATION_DURATION: Duration = Duration::from_millis(750);
pub const FRAME_STEP: Duration = Duration::from_millis(50);

/// Linear transition of the displayed fill level between two states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillAnimation {
    from: f32,
    to: f32,
}

impl FillAnimation {
    pub fn between(from: f32, to: f32) -> Self {
        Self {
            from: from.clamp(0.0, 1.0),
            to: to.clamp(0.0, 1.0),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Displayed level `elapsed` into the transition; pinned to the target
    /// once the duration has passed.
    pub fn level_at(&self, elapsed: Duration) -> f32 {
        let t = (elapsed.as_secs_f32() / ANIMATION_DURATION.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    /// All frames at [`FRAME_STEP`] spacing, ending exactly on the target.
    pub fn frames(&self) -> Vec<f32> {
        let mut frames = Vec::new();
        let mut elapsed = Duration::ZERO;
        while elapsed < ANIMATION_DURATION {
            frames.push(self.level_at(elapsed));
            elapsed += FRAME_STEP;
        }
        frames.push(self.to);
        frames
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Drunk,
    Remain,
}

/// Labels whose accent color flips because the fill passed their threshold
/// during this transition.
pub fn crossed_labels(from: f32, to: f32) -> Vec<Label> {
    let mut crossed = Vec::new();
    if from < DRUNK_LABEL_THRESHOLD && to >= DRUNK_LABEL_THRESHOLD {
        crossed.push(Label::Drunk);
    }
    if from < REMAIN_LABEL_THRESHOLD && to >= REMAIN_LABEL_THRESHOLD {
        crossed.push(Label::Remain);
    }
    crossed
}
