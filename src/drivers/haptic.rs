// Motion Lock - Haptic Motor Driver
//
// Simple GPIO-driven vibration motor.

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use motion_lock::config::HAPTIC_GAP_MS;

pub struct HapticDriver<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> HapticDriver<'d> {
    pub fn new(pin: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        Self { pin }
    }

    /// Vibrate for a custom duration (blocks the calling thread).
    pub fn buzz(&mut self, duration: Duration) {
        let _ = self.pin.set_high();
        thread::sleep(duration);
        let _ = self.pin.set_low();
    }

    /// `count` pulses of `on` each, separated by a fixed gap.
    pub fn pattern(&mut self, count: u8, on: Duration) {
        for i in 0..count {
            if i > 0 {
                thread::sleep(Duration::from_millis(HAPTIC_GAP_MS));
            }
            self.buzz(on);
        }
    }
}
