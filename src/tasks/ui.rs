// Motion Lock - UI Task
//
// Owns the haptic motor and the trigger button. Polls the button at ~100 Hz
// and renders lock transitions from the lock task as vibration patterns.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver};

use motion_lock::config::*;
use motion_lock::{Transition, TransitionDetail, TriggerFlag};

use crate::drivers::haptic::HapticDriver;
use crate::input::InputManager;

pub fn ui_task(
    button_pin: PinDriver<'static, AnyIOPin, Input>,
    haptic_pin: PinDriver<'static, AnyOutputPin, Output>,
    ui_rx: Receiver<Transition>,
    trigger: Arc<TriggerFlag>,
) {
    log::info!("UI task started");

    let mut haptic = HapticDriver::new(haptic_pin);
    let mut input = InputManager::new(button_pin, trigger);

    let poll_interval = Duration::from_millis(UI_POLL_INTERVAL_MS);
    let mut locked_out = false;

    loop {
        // 1. Poll the button; the lock ignores triggers once locked out.
        if !locked_out && input.update() {
            log::debug!("Trigger pressed");
        }

        // 2. Drain all pending transitions (non-blocking).
        while let Ok(transition) = ui_rx.try_recv() {
            locked_out |= transition.is_lockout();
            render(&mut haptic, &transition);
        }

        thread::sleep(poll_interval);
    }
}

fn render(haptic: &mut HapticDriver<'_>, transition: &Transition) {
    let short = Duration::from_millis(HAPTIC_SHORT_MS);
    let long = Duration::from_millis(HAPTIC_LONG_MS);

    // The lock loop already logs every transition with its payload.
    match transition.detail {
        Some(TransitionDetail::Verdict(_)) => haptic.buzz(long),
        Some(TransitionDetail::Rejected {
            attempts_remaining: 0,
            ..
        }) => haptic.pattern(3, long),
        Some(TransitionDetail::Rejected { .. }) => haptic.pattern(2, short),
        Some(TransitionDetail::Recorded { .. }) => haptic.buzz(short),
        Some(TransitionDetail::Captured { .. }) => {}
        None => {
            if transition.to.is_sampling() {
                haptic.buzz(short);
            }
        }
    }
}
