// Pincab — Event & Key Types

// ---------------------------------------------------------------------------
// Output Keys
// ---------------------------------------------------------------------------

/// Keyboard keys the controller can emit, named for what the cabinet wiring
/// uses them for. Visual Pinball's default key map drives the choice of
/// Shift/Ctrl for flippers and magna saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Nudge left.
    Z,
    /// Nudge right.
    Slash,
    /// Plunger / launch ball.
    Enter,
    /// Left flipper.
    LeftShift,
    /// Left magna save / secondary flipper.
    LeftCtrl,
    /// Right flipper.
    RightShift,
    /// Right magna save / secondary flipper.
    RightCtrl,
    /// Terminate the running table.
    Esc,
    /// Player 1 start.
    Num1,
    /// Insert coin.
    Num5,
}

// ---------------------------------------------------------------------------
// Commands & Gesture Outcomes
// ---------------------------------------------------------------------------

/// A single keyboard command for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Down(Key),
    Up(Key),
}

/// Outcome of one nudge-detection tick. Valid for exactly that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    None,
    Left,
    Right,
}
