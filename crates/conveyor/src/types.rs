//! Configuration types for the conveyor pipeline

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Configuration for a bounded pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of computations that may be outstanding at once.
    ///
    /// Must be at least 2: with the window holding `parallelism - 1` handles
    /// plus the one just pulled, anything lower degenerates to serial
    /// execution, which [`serial`](crate::serial) provides explicitly.
    pub parallelism: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallelism: num_cpus::get().max(2),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with the given parallelism
    pub fn new(parallelism: usize) -> Self {
        Self { parallelism }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.parallelism < 2 {
            return Err(ConfigError::invalid_parallelism(self.parallelism));
        }
        Ok(())
    }

    /// Capacity of the sliding window: one less than the parallelism, since
    /// the handle pulled on the current iteration is the final outstanding
    /// computation.
    pub(crate) fn window_capacity(&self) -> usize {
        self.parallelism - 1
    }
}
