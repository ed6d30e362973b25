// Motion Lock - Lock Task
//
// Fixed-rate loop (~62.5 Hz). Each iteration consumes a pending trigger,
// offers the lock one sample from the IMU and forwards any transition to the
// UI task. This loop is the only writer of lock state.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use motion_lock::config::SENSOR_SAMPLE_INTERVAL_MS;
use motion_lock::{LockConfig, LockLoop, Sample, SampleSource, Transition, TriggerFlag};

use crate::drivers::imu::Mpu6050;

/// IMU-backed sample source. A failed read repeats the last good sample.
struct ImuSampler {
    imu: Mpu6050,
    last: Sample,
}

impl SampleSource for ImuSampler {
    fn read_sample(&mut self) -> Sample {
        match self.imu.read_accel() {
            Ok(sample) => self.last = sample,
            Err(e) => log::warn!("IMU read error: {}", e),
        }
        self.last
    }
}

pub fn lock_task(
    mut imu: Mpu6050,
    trigger: &TriggerFlag,
    ui_tx: Sender<Transition>,
) -> anyhow::Result<()> {
    log::info!("Lock task started");

    if let Err(e) = imu.init() {
        // Keep looping so the lock and its logs stay reachable over serial.
        log::error!("MPU6050 init failed in lock task: {}", e);
    }
    let mut sampler = ImuSampler {
        imu,
        last: Sample::default(),
    };

    let config = LockConfig::default();
    log::info!(
        "Matching with {:?} (threshold {}), {} attempts",
        config.metric,
        config.threshold,
        config.max_attempts
    );
    let mut lock: LockLoop = LockLoop::new(config)?;
    let mut sink = ui_tx;

    let interval = Duration::from_millis(SENSOR_SAMPLE_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        lock.poll(trigger, &mut sampler, &mut sink);

        // Sleep for the remainder of the sampling interval to maintain ~62.5 Hz.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
