//! Configuration for the in-memory backend

use serde::{Deserialize, Serialize};
use sparqlz_core::{Result, ResultOptions, SparqlzError};
use std::time::Duration;

/// Settings for [`MemoryConnection`](crate::MemoryConnection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Rows appended per progress step of an asynchronous execution
    pub batch_size: usize,
    /// Pause before each batch, simulating a slow backend
    pub batch_delay_ms: u64,
    /// Options applied to every result the connection creates
    pub result: ResultOptions,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            batch_delay_ms: 0,
            result: ResultOptions::default(),
        }
    }
}

impl MemoryConfig {
    /// Parse configuration from a TOML document. Missing keys take their
    /// defaults; the result options live under a `[result]` table.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| SparqlzError::Configuration(format!("invalid memory config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SparqlzError::Configuration(
                "batch_size must be greater than zero".into(),
            ));
        }
        self.result.validate()
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_batch_delay_ms(mut self, delay_ms: u64) -> Self {
        self.batch_delay_ms = delay_ms;
        self
    }

    pub fn with_result_options(mut self, options: ResultOptions) -> Self {
        self.result = options;
        self
    }
}
