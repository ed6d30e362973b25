// Motion Lock - MPU6050 IMU Driver
//
// Custom register-level driver over I2C.
// Avoids external crate version conflicts with esp-idf-hal.

use esp_idf_hal::i2c::I2cDriver;

use motion_lock::config::*;
use motion_lock::Sample;

// MPU6050 register addresses
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_CONFIG: u8 = 0x1A;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 6-byte accelerometer burst
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050 {
    i2c: I2cDriver<'static>,
}

impl Mpu6050 {
    pub fn new(i2c: I2cDriver<'static>) -> Self {
        Self { i2c }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&mut self) -> bool {
        let mut buf = [0u8; 1];
        match self
            .i2c
            .write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS)
        {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor and configure accel (±8 g), DLPF 21 Hz.
    pub fn init(&mut self) -> anyhow::Result<()> {
        // Wake up (clear SLEEP bit)
        self.i2c
            .write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, 0x00], I2C_TIMEOUT_TICKS)?;

        // DLPF bandwidth 21 Hz
        self.i2c
            .write(I2C_ADDR_MPU6050, &[REG_CONFIG, 0x04], I2C_TIMEOUT_TICKS)?;

        // Accelerometer: ±8 g
        self.i2c
            .write(I2C_ADDR_MPU6050, &[REG_ACCEL_CONFIG, 0x10], I2C_TIMEOUT_TICKS)?;

        log::info!(
            "MPU6050 initialised (±8g = {} LSB/g, DLPF 21Hz)",
            ACCEL_SCALE_8G
        );
        Ok(())
    }

    /// Burst-read the accelerometer as raw signed counts.
    pub fn read_accel(&mut self) -> anyhow::Result<Sample> {
        let mut raw = [0u8; 6];
        self.i2c.write_read(
            I2C_ADDR_MPU6050,
            &[REG_ACCEL_XOUT_H],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        Ok(Sample {
            x: i16::from_be_bytes([raw[0], raw[1]]),
            y: i16::from_be_bytes([raw[2], raw[3]]),
            z: i16::from_be_bytes([raw[4], raw[5]]),
        })
    }
}
