//! Result configuration

use crate::{Result, SparqlzError};
use serde::{Deserialize, Serialize};

/// Options controlling how a buffered result reports its state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultOptions {
    /// Report `size()` while rows are still arriving. When false the size is
    /// unknown until the result finishes.
    pub live_size: bool,
    /// Capacity of the broadcast progress channel
    pub event_capacity: usize,
}

impl Default for ResultOptions {
    fn default() -> Self {
        Self {
            live_size: true,
            event_capacity: 64,
        }
    }
}

impl ResultOptions {
    /// Parse options from a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let options: Self = toml::from_str(input)
            .map_err(|e| SparqlzError::Configuration(format!("invalid result options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(SparqlzError::Configuration(
                "event_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn with_live_size(mut self, live_size: bool) -> Self {
        self.live_size = live_size;
        self
    }
}
