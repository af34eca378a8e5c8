// Pincab — Hardware & System Configuration
// Target: ESP32-S3 (native USB-OTG for the HID keyboard)

use pincab_core::events::Key;

// ---------------------------------------------------------------------------
// I2C Bus (LSM6DS3 accelerometer on GPIO8/GPIO9)
// ---------------------------------------------------------------------------
pub const I2C_ADDR_LSM6DS3: u8 = 0x6A;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Accelerometer
// ---------------------------------------------------------------------------
pub const ACCEL_SENSITIVITY_UG: i32 = 61; // µg per LSB at ±2 g full scale

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const TICK_PERIOD_MS: u64 = 16; // ~60 Hz — one poll of nudge + all switches

// ---------------------------------------------------------------------------
// Nudge Tuning
// ---------------------------------------------------------------------------
pub const NUDGE_THRESHOLD: i32 = 400_000; // µg magnitude delta between ticks
pub const NUDGE_SKIP_BUDGET: u32 = 5;     // ticks to ignore after a detection

// ---------------------------------------------------------------------------
// Key Bindings
// ---------------------------------------------------------------------------
pub const NUDGE_LEFT_KEY: Key = Key::Z;
pub const NUDGE_RIGHT_KEY: Key = Key::Slash;

/// Cabinet switches in scan order. `main` configures the matching GPIOs
/// (INPUT_PULLUP, active LOW) in exactly this order.
pub const BUTTON_KEYS: [Key; 8] = [
    Key::Enter,      // GPIO4  — plunger / launch
    Key::LeftShift,  // GPIO5  — left flipper
    Key::LeftCtrl,   // GPIO6  — left magna save
    Key::RightShift, // GPIO7  — right flipper
    Key::RightCtrl,  // GPIO15 — right magna save
    Key::Esc,        // GPIO16 — terminate table
    Key::Num1,       // GPIO17 — player 1 start
    Key::Num5,       // GPIO18 — insert coin
];
