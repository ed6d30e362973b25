// Motion Lock - Trigger Button
//
// Debounced button poller. Each press edge (released -> pressed) sets the
// shared trigger flag; the lock loop consumes it. Designed to be polled at
// ~100 Hz from the UI task.

use std::sync::Arc;
use std::time::Instant;

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver};

use motion_lock::config::DEBOUNCE_MS;
use motion_lock::TriggerFlag;

pub struct InputManager<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
    trigger: Arc<TriggerFlag>,

    // Debounce state
    last_raw: bool,
    last_debounce: Instant,

    button_down: bool,
}

impl<'d> InputManager<'d> {
    pub fn new(pin: PinDriver<'d, AnyIOPin, Input>, trigger: Arc<TriggerFlag>) -> Self {
        Self {
            pin,
            trigger,
            last_raw: true, // pull-up → idle HIGH
            last_debounce: Instant::now(),
            button_down: false,
        }
    }

    /// Call every ~10 ms from the UI task loop. Returns `true` on a press edge.
    pub fn update(&mut self) -> bool {
        let current = self.pin.is_high(); // true = released (pull-up)
        let now = Instant::now();

        // ---- debounce filter ----
        if current != self.last_raw {
            self.last_debounce = now;
        }
        self.last_raw = current;

        let stable_ms = now.duration_since(self.last_debounce).as_millis() as u64;
        if stable_ms < DEBOUNCE_MS {
            return false;
        }

        let pressed = !current; // active LOW

        if pressed && !self.button_down {
            self.button_down = true;
            self.trigger.set();
            return true;
        }
        if !pressed {
            self.button_down = false;
        }
        false
    }
}
