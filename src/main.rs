// Pincab — Firmware Entry Point
//
// Virtual-pinball cabinet controller: eight cabinet switches plus an
// accelerometer nudge sensor in, USB HID keyboard out.
//
// Boot sequence:
//   1. Bring up logging and take the peripherals.
//   2. Configure the I2C bus and the LSM6DS3 accelerometer, retrying every
//      second until the sensor answers.
//   3. Install the USB HID keyboard.
//   4. Configure the cabinet switches as pulled-up inputs.
//   5. Run the control loop forever at the configured tick rate.

mod config;
mod drivers;

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{IOPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;

use pincab_core::controller::Controller;

use crate::config::*;
use crate::drivers::buttons::ButtonBank;
use crate::drivers::imu::Lsm6ds3;
use crate::drivers::keyboard::UsbKeyboard;

fn main() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Pincab firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus + accelerometer ------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8, // SDA
        peripherals.pins.gpio9, // SCL
        &i2c_config,
    )?;

    let mut imu = Lsm6ds3::new(i2c);
    // The cabinet is unplayable without nudge input, so keep retrying until
    // the sensor answers rather than booting degraded.
    while let Err(e) = imu.init() {
        log::error!("accelerometer init failed: {e}");
        thread::sleep(Duration::from_secs(1));
    }

    // ---- USB keyboard ------------------------------------------------------
    let keyboard = UsbKeyboard::install()?;

    // ---- Cabinet switches (INPUT_PULLUP, active LOW) -----------------------
    // Same order as config::BUTTON_KEYS.
    let mut pins = vec![
        PinDriver::input(peripherals.pins.gpio4.downgrade())?,
        PinDriver::input(peripherals.pins.gpio5.downgrade())?,
        PinDriver::input(peripherals.pins.gpio6.downgrade())?,
        PinDriver::input(peripherals.pins.gpio7.downgrade())?,
        PinDriver::input(peripherals.pins.gpio15.downgrade())?,
        PinDriver::input(peripherals.pins.gpio16.downgrade())?,
        PinDriver::input(peripherals.pins.gpio17.downgrade())?,
        PinDriver::input(peripherals.pins.gpio18.downgrade())?,
    ];
    for pin in pins.iter_mut() {
        pin.set_pull(Pull::Up)?;
    }
    let buttons = ButtonBank::new(pins);

    // ---- Control loop ------------------------------------------------------
    let mut controller = Controller::new(
        imu,
        buttons,
        keyboard,
        NUDGE_THRESHOLD,
        NUDGE_SKIP_BUDGET,
        NUDGE_LEFT_KEY,
        NUDGE_RIGHT_KEY,
        &BUTTON_KEYS,
    );

    log::info!("entering control loop ({TICK_PERIOD_MS} ms tick)");
    controller.run(Duration::from_millis(TICK_PERIOD_MS))
}
