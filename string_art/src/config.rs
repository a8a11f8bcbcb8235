use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters of a single generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of nails placed around the circle.
    pub dots_count: usize,
    /// Number of chords the string path is made of.
    pub line_count: usize,
    /// Darkening added by every chord, both while searching and while rendering.
    pub opacity: u8,
    /// Side of the square working image, in pixels.
    pub resolution: u32,
    /// Seed for the starting nail. A fresh one is drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Capacity of the chord hand-off between the sequencer and the renderer.
    pub queue_capacity: usize,
    /// Lines between two render progress reports.
    pub progress_interval: usize,
}

impl Config {
    pub const DEFAULT_DOTS_COUNT: usize = 300;
    pub const DEFAULT_LINE_COUNT: usize = 10000;
    pub const DEFAULT_OPACITY: u8 = 26;
    pub const DEFAULT_RESOLUTION: u32 = 1080;
    /// Pixel indexes are stored as `u32`.
    pub const MAX_RESOLUTION: u32 = u16::MAX as u32;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dots_count < 2 {
            return Err(ConfigError::DotsCount(self.dots_count));
        }
        if self.line_count < 1 {
            return Err(ConfigError::LineCount);
        }
        if !(1..=Self::MAX_RESOLUTION).contains(&self.resolution) {
            return Err(ConfigError::Resolution(self.resolution));
        }
        if self.queue_capacity < 1 {
            return Err(ConfigError::QueueCapacity);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dots_count: Self::DEFAULT_DOTS_COUNT,
            line_count: Self::DEFAULT_LINE_COUNT,
            opacity: Self::DEFAULT_OPACITY,
            resolution: Self::DEFAULT_RESOLUTION,
            seed: None,
            queue_capacity: 1024,
            progress_interval: 100,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least 2 nails are required, got {0}")]
    DotsCount(usize),
    #[error("At least 1 line must be drawn")]
    LineCount,
    #[error("Resolution must be between 1 and {max}, got {0}", max = Config::MAX_RESOLUTION)]
    Resolution(u32),
    #[error("Queue capacity must be greater than 0")]
    QueueCapacity,
}
