// Motion Lock - Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the I2C bus and check that the MPU6050 answers.
//   2. Spawn the UI task (trigger button + haptic feedback).
//   3. Run the lock loop on the main thread at the sensor sample rate.
//
// Button presses walk the lock through record -> ready -> replay -> check.
// Five failed replays lock the device permanently.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod input;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    use esp_idf_hal::gpio::{IOPin, OutputPin, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use motion_lock::config::*;
    use motion_lock::TriggerFlag;

    use crate::drivers::imu::Mpu6050;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Motion Lock firmware starting…");
    log::info!(
        "Pins: button GPIO{}, haptic GPIO{}, I2C SDA GPIO{} / SCL GPIO{}",
        PIN_BUTTON,
        PIN_HAPTIC,
        PIN_I2C_SDA,
        PIN_I2C_SCL
    );

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // Trigger button (pull-up, active LOW).
    let mut button = PinDriver::input(peripherals.pins.gpio3.downgrade())?;
    button.set_pull(Pull::Up)?;

    let haptic_pin = PinDriver::output(peripherals.pins.gpio4.downgrade_output())?;

    // ---- I2C bus (MPU6050 only) -------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;

    // ---- Self-test --------------------------------------------------------
    let mut imu = Mpu6050::new(i2c);
    if !imu.is_connected() {
        // Continue anyway so we can still debug via serial.
        log::error!("Boot check FAILED - MPU6050 not responding");
    }

    // ---- Shared state (the trigger flag is the only cell both tasks touch) --
    let trigger = Arc::new(TriggerFlag::new());
    let (ui_tx, ui_rx) = mpsc::channel();

    // ---- UI task (button + haptic) ----------------------------------------
    let ui_trigger = Arc::clone(&trigger);
    thread::Builder::new()
        .name("ui".into())
        .stack_size(STACK_UI)
        .spawn(move || {
            tasks::ui::ui_task(button, haptic_pin, ui_rx, ui_trigger);
        })?;

    log::info!("Boot complete - press the button to record a gesture");

    // ---- Lock loop (sole owner of lock state) -----------------------------
    tasks::lock::lock_task(imu, &trigger, ui_tx)
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!(
        "the motion-lock firmware only runs on ESP-IDF targets; host builds provide the motion_lock library"
    )
}
