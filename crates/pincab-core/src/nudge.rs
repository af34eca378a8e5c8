// Pincab — Nudge Gesture Detection
//
// Classifies single-axis acceleration deltas into discrete left/right tap
// events. A detection opens a cooldown window during which nothing further
// fires, so one physical shove registers as exactly one tap.

use crate::events::Nudge;

/// Stateful tap detector over a stream of acceleration samples (µg).
///
/// The threshold is applied to the delta of sample *magnitudes* between
/// consecutive ticks; the tap direction comes from the *signed* comparison
/// of the raw samples. Both halves of that heuristic are load-bearing —
/// tables tuned against it expect a fall from a large negative reading to
/// read as a right tap.
#[derive(Debug, Clone, Copy)]
pub struct NudgeDetector {
    threshold: i32,
    cooldown_budget: u32,
    previous: i32,
    cooldown: u32,
    gesture_active: bool,
}

impl NudgeDetector {
    /// `first_sample` seeds the previous-sample reference so the first real
    /// tick has something to diff against.
    pub fn new(threshold: i32, cooldown_budget: u32, first_sample: i32) -> Self {
        Self {
            threshold,
            cooldown_budget,
            previous: first_sample,
            cooldown: 0,
            gesture_active: false,
        }
    }

    /// Classify one sample.
    ///
    /// Returns `Nudge::Left`/`Nudge::Right` only on the tick a tap first
    /// crosses the threshold; every other tick — including the rest of the
    /// cooldown window — reports `Nudge::None`.
    pub fn detect(&mut self, sample: i32) -> Nudge {
        let mut outcome = Nudge::None;

        if self.cooldown == 0 && !self.gesture_active {
            let delta = (sample.abs() - self.previous.abs()).abs();
            if delta > self.threshold {
                outcome = if sample > self.previous {
                    Nudge::Right
                } else {
                    Nudge::Left
                };
                self.cooldown = self.cooldown_budget;
                self.gesture_active = true;
            }
        } else if self.cooldown == 0 {
            // Cooldown fully drained — re-arm for the next eligible tick.
            self.gesture_active = false;
        }

        self.previous = sample;
        outcome
    }

    /// Burn one tick of the cooldown window. The control loop calls this
    /// once per iteration, after `detect`; the counter floors at zero.
    pub fn end_tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}
