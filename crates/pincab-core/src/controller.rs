// Pincab — Control Loop
//
// Fixed-rate orchestration: read one acceleration sample, run nudge
// detection, then walk every binding in a fixed order and dispatch the
// resulting key commands. Hardware access sits behind the three traits
// below so the loop body runs unchanged against scripted doubles.

use std::thread;
use std::time::{Duration, Instant};

use crate::events::{Key, KeyCommand, Nudge};
use crate::input::Binding;
use crate::nudge::NudgeDetector;

// ---------------------------------------------------------------------------
// Hardware-facing traits
// ---------------------------------------------------------------------------

/// Single-axis accelerometer sample stream (µg).
pub trait SampleSource {
    fn read_sample(&mut self) -> anyhow::Result<i32>;
}

/// Normalized digital button lines: `true` = physically pressed. Any
/// active-low inversion happens behind this trait, not in the loop.
pub trait Buttons {
    fn is_pressed(&mut self, line: usize) -> bool;
}

/// Key command consumer — the USB HID keyboard in firmware, a recorder in
/// tests.
pub trait KeyPort {
    fn down(&mut self, key: Key) -> anyhow::Result<()>;
    fn up(&mut self, key: Key) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Where a binding's level signal comes from each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    NudgeRight,
    NudgeLeft,
    Button(usize),
}

pub struct Controller<S, B, K> {
    samples: S,
    buttons: B,
    keys: K,
    detector: NudgeDetector,
    bindings: Vec<(Source, Binding)>,
    last_sample: i32,
}

impl<S: SampleSource, B: Buttons, K: KeyPort> Controller<S, B, K> {
    /// Wire up the full binding set: the two synthetic nudge channels first,
    /// then one binding per physical line in `button_keys` order. That order
    /// is also the per-tick dispatch order.
    pub fn new(
        mut samples: S,
        buttons: B,
        keys: K,
        threshold: i32,
        cooldown_ticks: u32,
        nudge_left: Key,
        nudge_right: Key,
        button_keys: &[Key],
    ) -> Self {
        // Seed the detector from the first read; a neutral zero stands in
        // when the sensor is not answering yet.
        let first = match samples.read_sample() {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!("initial accelerometer read failed: {e}");
                0
            }
        };

        let mut bindings = Vec::with_capacity(button_keys.len() + 2);
        bindings.push((Source::NudgeRight, Binding::new(nudge_right)));
        bindings.push((Source::NudgeLeft, Binding::new(nudge_left)));
        for (line, key) in button_keys.iter().enumerate() {
            bindings.push((Source::Button(line), Binding::new(*key)));
        }

        Self {
            samples,
            buttons,
            keys,
            detector: NudgeDetector::new(threshold, cooldown_ticks, first),
            bindings,
            last_sample: first,
        }
    }

    /// One control-loop iteration.
    pub fn tick(&mut self) {
        let sample = match self.samples.read_sample() {
            Ok(sample) => {
                self.last_sample = sample;
                sample
            }
            Err(e) => {
                log::warn!("accelerometer read failed, reusing previous sample: {e}");
                self.last_sample
            }
        };

        let nudge = self.detector.detect(sample);

        for (source, binding) in self.bindings.iter_mut() {
            let active = match *source {
                Source::NudgeRight => nudge == Nudge::Right,
                Source::NudgeLeft => nudge == Nudge::Left,
                Source::Button(line) => self.buttons.is_pressed(line),
            };

            // Binding state commits regardless of dispatch success; a failed
            // Down is not retried until a release/press cycle.
            match binding.update(active) {
                Some(KeyCommand::Down(key)) => {
                    log::debug!("{key:?} down");
                    if let Err(e) = self.keys.down(key) {
                        log::warn!("failed to send {key:?} down: {e}");
                    }
                }
                Some(KeyCommand::Up(key)) => {
                    log::debug!("{key:?} up");
                    if let Err(e) = self.keys.up(key) {
                        log::warn!("failed to send {key:?} up: {e}");
                    }
                }
                None => {}
            }
        }

        self.detector.end_tick();
    }

    /// Run forever at the given tick period, sleeping away whatever remains
    /// of each period after the hardware work. Best effort, not hard
    /// real-time.
    pub fn run(&mut self, period: Duration) -> ! {
        loop {
            let tick_start = Instant::now();
            self.tick();
            let elapsed = tick_start.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    const THRESHOLD: i32 = 400_000;
    const COOLDOWN: u32 = 5;
    const BUTTON_KEYS: [Key; 2] = [Key::Enter, Key::LeftShift];

    #[derive(Clone, Default)]
    struct ScriptedSamples(Rc<RefCell<VecDeque<anyhow::Result<i32>>>>);

    impl ScriptedSamples {
        fn push(&self, sample: i32) {
            self.0.borrow_mut().push_back(Ok(sample));
        }

        fn push_err(&self, msg: &str) {
            self.0.borrow_mut().push_back(Err(anyhow::anyhow!(msg.to_owned())));
        }
    }

    impl SampleSource for ScriptedSamples {
        fn read_sample(&mut self) -> anyhow::Result<i32> {
            // Past the end of the script the sensor just reads quiet.
            self.0.borrow_mut().pop_front().unwrap_or(Ok(0))
        }
    }

    #[derive(Clone)]
    struct SharedButtons(Rc<RefCell<Vec<bool>>>);

    impl SharedButtons {
        fn new(lines: usize) -> Self {
            Self(Rc::new(RefCell::new(vec![false; lines])))
        }

        fn set(&self, line: usize, pressed: bool) {
            self.0.borrow_mut()[line] = pressed;
        }
    }

    impl Buttons for SharedButtons {
        fn is_pressed(&mut self, line: usize) -> bool {
            self.0.borrow()[line]
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPort {
        sent: Rc<RefCell<Vec<KeyCommand>>>,
        fail: Rc<Cell<bool>>,
    }

    impl RecordingPort {
        fn sent(&self) -> Vec<KeyCommand> {
            self.sent.borrow().clone()
        }

        fn set_fail(&self, fail: bool) {
            self.fail.set(fail);
        }
    }

    impl KeyPort for RecordingPort {
        fn down(&mut self, key: Key) -> anyhow::Result<()> {
            if self.fail.get() {
                anyhow::bail!("endpoint not ready");
            }
            self.sent.borrow_mut().push(KeyCommand::Down(key));
            Ok(())
        }

        fn up(&mut self, key: Key) -> anyhow::Result<()> {
            if self.fail.get() {
                anyhow::bail!("endpoint not ready");
            }
            self.sent.borrow_mut().push(KeyCommand::Up(key));
            Ok(())
        }
    }

    fn make() -> (
        Controller<ScriptedSamples, SharedButtons, RecordingPort>,
        ScriptedSamples,
        SharedButtons,
        RecordingPort,
    ) {
        let samples = ScriptedSamples::default();
        samples.push(0); // seed read in Controller::new
        let buttons = SharedButtons::new(BUTTON_KEYS.len());
        let port = RecordingPort::default();
        let controller = Controller::new(
            samples.clone(),
            buttons.clone(),
            port.clone(),
            THRESHOLD,
            COOLDOWN,
            Key::Z,
            Key::Slash,
            &BUTTON_KEYS,
        );
        (controller, samples, buttons, port)
    }

    #[test]
    fn nudge_tap_is_a_one_tick_key_pulse() {
        let (mut c, samples, _buttons, port) = make();
        samples.push(500_000);

        c.tick();
        assert_eq!(port.sent(), vec![KeyCommand::Down(Key::Slash)]);

        // Outcome returns to None immediately, so the very next tick
        // releases the key: one tick period minimum hold.
        c.tick();
        assert_eq!(
            port.sent(),
            vec![KeyCommand::Down(Key::Slash), KeyCommand::Up(Key::Slash)]
        );
    }

    #[test]
    fn left_nudge_drives_the_left_key() {
        let (mut c, samples, _buttons, port) = make();
        samples.push(-500_000);

        c.tick();
        c.tick();
        assert_eq!(
            port.sent(),
            vec![KeyCommand::Down(Key::Z), KeyCommand::Up(Key::Z)]
        );
    }

    #[test]
    fn button_hold_spans_down_to_up() {
        let (mut c, _samples, buttons, port) = make();

        buttons.set(0, true);
        c.tick();
        assert_eq!(port.sent(), vec![KeyCommand::Down(Key::Enter)]);

        // Held — nothing new.
        c.tick();
        c.tick();
        assert_eq!(port.sent(), vec![KeyCommand::Down(Key::Enter)]);

        buttons.set(0, false);
        c.tick();
        assert_eq!(
            port.sent(),
            vec![KeyCommand::Down(Key::Enter), KeyCommand::Up(Key::Enter)]
        );
    }

    #[test]
    fn stale_sample_avoids_phantom_tap_after_dropout() {
        let (mut c, samples, _buttons, port) = make();
        samples.push(500_000);
        c.tick();

        // Ride out the cooldown window with a steady reading.
        for _ in 0..6 {
            samples.push(500_000);
            c.tick();
        }

        // Bus fault on an eligible tick: the loop reuses 500 000, the delta
        // is zero, and no phantom tap fires (a substituted zero would read
        // as a hard left).
        samples.push_err("bus fault");
        c.tick();

        assert_eq!(
            port.sent(),
            vec![KeyCommand::Down(Key::Slash), KeyCommand::Up(Key::Slash)]
        );
    }

    #[test]
    fn failed_down_is_not_retried_while_held() {
        let (mut c, _samples, buttons, port) = make();

        port.set_fail(true);
        buttons.set(0, true);
        c.tick(); // Down attempt fails; pressed state commits anyway
        c.tick(); // still held — no retry
        port.set_fail(false);
        c.tick(); // still held — still no retry
        buttons.set(0, false);
        c.tick(); // release goes through

        assert_eq!(port.sent(), vec![KeyCommand::Up(Key::Enter)]);
    }

    #[test]
    fn bindings_dispatch_in_fixed_order() {
        let (mut c, samples, buttons, port) = make();
        samples.push(500_000);
        buttons.set(0, true);
        buttons.set(1, true);

        c.tick();
        assert_eq!(
            port.sent(),
            vec![
                KeyCommand::Down(Key::Slash),
                KeyCommand::Down(Key::Enter),
                KeyCommand::Down(Key::LeftShift),
            ]
        );
    }
}
