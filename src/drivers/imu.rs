// Pincab — LSM6DS3 Accelerometer Driver
//
// Register-level driver over I2C, reading only the Y axis — the
// side-to-side axis a cabinet nudge rides on.

use esp_idf_hal::i2c::I2cDriver;

use pincab_core::controller::SampleSource;

use crate::config::*;

// LSM6DS3 register addresses
const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL1_XL: u8 = 0x10;
const REG_OUTY_L_XL: u8 = 0x2A; // low byte first, auto-increment to 0x2B

const WHO_AM_I_LSM6DS3: u8 = 0x69;
const WHO_AM_I_LSM6DS3TRC: u8 = 0x6A; // drop-in replacement part, same map

pub struct Lsm6ds3<'d> {
    i2c: I2cDriver<'d>,
}

impl<'d> Lsm6ds3<'d> {
    pub fn new(i2c: I2cDriver<'d>) -> Self {
        Self { i2c }
    }

    /// Verify the device answers with a known WHO_AM_I.
    pub fn is_connected(&mut self) -> bool {
        let mut buf = [0u8; 1];
        match self
            .i2c
            .write_read(I2C_ADDR_LSM6DS3, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS)
        {
            Ok(()) => buf[0] == WHO_AM_I_LSM6DS3 || buf[0] == WHO_AM_I_LSM6DS3TRC,
            Err(_) => false,
        }
    }

    /// Configure the accelerometer: ±2 g full scale, 13 Hz ODR.
    pub fn init(&mut self) -> anyhow::Result<()> {
        if !self.is_connected() {
            anyhow::bail!(
                "LSM6DS3 not responding at I2C address {:#04x}",
                I2C_ADDR_LSM6DS3
            );
        }

        // ODR_XL = 13 Hz (0001), FS_XL = ±2 g (00)
        self.i2c
            .write(I2C_ADDR_LSM6DS3, &[REG_CTRL1_XL, 0x10], I2C_TIMEOUT_TICKS)?;

        log::info!("LSM6DS3 initialised (±2g, 13Hz)");
        Ok(())
    }

    /// Read the Y-axis acceleration, scaled to µg.
    pub fn read_accel_y(&mut self) -> anyhow::Result<i32> {
        let mut raw = [0u8; 2];
        self.i2c.write_read(
            I2C_ADDR_LSM6DS3,
            &[REG_OUTY_L_XL],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        Ok(i16::from_le_bytes(raw) as i32 * ACCEL_SENSITIVITY_UG)
    }
}

impl SampleSource for Lsm6ds3<'_> {
    fn read_sample(&mut self) -> anyhow::Result<i32> {
        self.read_accel_y()
    }
}
