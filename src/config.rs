//! Configuration management for the follow graph analyzer

use anyhow::{bail, Result};
use crate::community::detection::DEFAULT_MAX_ITERATIONS;

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of influencers kept per ranking
    pub top_k: usize,

    /// Upper bound on label propagation rounds
    pub max_iterations: usize,

    /// Skip self-loop records instead of failing the run
    pub skip_self_loops: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            skip_self_loops: false,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(top_k: usize, max_iterations: usize, skip_self_loops: bool) -> Self {
        Self {
            top_k,
            max_iterations,
            skip_self_loops,
        }
    }

    /// Reject settings a command-line run cannot use
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            bail!("top_k must be a positive integer");
        }
        if self.max_iterations == 0 {
            bail!("max_iterations must be a positive integer");
        }
        Ok(())
    }
}
