//! Engine configuration
//!
//! ```json
//! { "name": "hello_world", "max_cycles": 10000 }
//! ```
//!
//! Both fields are optional. Without `max_cycles` an engine runs until its
//! last piston ends, which may be never.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Program name, used in log messages
    pub name: String,
    /// Upper bound on cycles for [`Engine::run`](crate::Engine::run)
    pub max_cycles: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "program".to_string(),
            max_cycles: None,
        }
    }
}

impl EngineConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style cycle bound
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
