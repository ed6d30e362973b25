// Motion Lock - Hardware, Timing & Matching Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V) + MPU6050

use anyhow::ensure;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 3;      // D1/A1 - Trigger button (INPUT_PULLUP, active LOW)
pub const PIN_HAPTIC: i32 = 4;      // D2/A2 - Haptic motor control
pub const PIN_I2C_SDA: i32 = 6;     // D4    - I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    - I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks
pub const I2C_BAUDRATE_KHZ: u32 = 400;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_UI: usize = 4096;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SENSOR_SAMPLE_INTERVAL_MS: u64 = 16;        // ~62.5 Hz lock loop tick
pub const UI_POLL_INTERVAL_MS: u64 = 10;               // 100 Hz input poll
pub const DEBOUNCE_MS: u64 = 50;

// ---------------------------------------------------------------------------
// Haptic feedback patterns (milliseconds)
// ---------------------------------------------------------------------------
pub const HAPTIC_SHORT_MS: u64 = 50;
pub const HAPTIC_LONG_MS: u64 = 400;
pub const HAPTIC_GAP_MS: u64 = 120;

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_8G: f32 = 4096.0;   // LSB/g at ±8 g

// ---------------------------------------------------------------------------
// Gesture matching
// ---------------------------------------------------------------------------

/// Capacity of each gesture sequence (~1.6 s at 62.5 Hz).
pub const MAX_GESTURE_SAMPLES: usize = 100;
/// Unlock tries before permanent lockout.
pub const MAX_UNLOCK_ATTEMPTS: u8 = 5;
/// Mean absolute per-axis distance accepted as a match, in raw LSB (~0.1 g at ±8 g).
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 410.0;
/// Minimum per-axis peak correlation accepted as a match, in LSB².
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 250_000.0;
/// Shortest replay, relative to the longer sequence, that may still match.
pub const DEFAULT_MIN_LENGTH_RATIO: f64 = 0.5;

/// Similarity metric used by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Mean of `|a - b|` over indices present in both sequences. Lower is closer.
    #[default]
    MeanAbsoluteDistance,
    /// Peak over all shifts of the mean pairwise product. Higher is closer.
    CrossCorrelation,
}

impl Metric {
    /// Apply the metric's comparator to one axis score.
    pub fn accepts(self, score: f64, threshold: f64) -> bool {
        match self {
            Self::MeanAbsoluteDistance => score < threshold,
            Self::CrossCorrelation => score > threshold,
        }
    }

    /// Threshold that makes sense for this metric out of the box.
    pub fn default_threshold(self) -> f64 {
        match self {
            Self::MeanAbsoluteDistance => DEFAULT_DISTANCE_THRESHOLD,
            Self::CrossCorrelation => DEFAULT_CORRELATION_THRESHOLD,
        }
    }
}

/// Tunables for the lock state machine and its similarity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockConfig {
    pub metric: Metric,
    /// Single calibrated threshold applied to every axis.
    pub threshold: f64,
    /// Initial value of the attempt counter.
    pub max_attempts: u8,
    /// Range: [0.0, 1.0]. 0.0 disables the length guard.
    pub min_length_ratio: f64,
}

impl LockConfig {
    /// Config for `metric` with its default threshold.
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            metric,
            threshold: metric.default_threshold(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.threshold.is_finite(),
            "match threshold must be finite, got {}",
            self.threshold
        );
        ensure!(
            self.metric == Metric::CrossCorrelation || self.threshold >= 0.0,
            "distance threshold must not be negative, got {}",
            self.threshold
        );
        ensure!(self.max_attempts > 0, "at least one unlock attempt is required");
        ensure!(
            (0.0..=1.0).contains(&self.min_length_ratio),
            "min_length_ratio must lie in [0, 1], got {}",
            self.min_length_ratio
        );
        Ok(())
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            threshold: DEFAULT_DISTANCE_THRESHOLD,
            max_attempts: MAX_UNLOCK_ATTEMPTS,
            min_length_ratio: DEFAULT_MIN_LENGTH_RATIO,
        }
    }
}
