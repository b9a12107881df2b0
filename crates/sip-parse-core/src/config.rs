use serde::{Deserialize, Serialize};

use crate::arena::ArenaLimits;
use crate::error::{Error, Result};

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Copy the input into an owned buffer before the grammar runs
    pub copy_input: bool,
    /// Replace folded lines (CRLF followed by whitespace) with a single space
    /// before parsing. Implies `copy_input`
    pub unfold_lws: bool,
    /// Limits of the scratch pool used for extension parameters
    pub scratch: ArenaLimits,
    /// Maximum number of comma-separated values on one header line
    pub max_list_elements: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            copy_input: false,
            unfold_lws: false,
            scratch: ArenaLimits::new(1024, 4),
            max_list_elements: 64,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON. Missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::BadParam(format!("invalid parser config: {}", e)))
    }

    pub fn with_copy_input(mut self, copy: bool) -> Self {
        self.copy_input = copy;
        self
    }

    pub fn with_unfold_lws(mut self, unfold: bool) -> Self {
        self.unfold_lws = unfold;
        self
    }

    pub fn with_scratch_limits(mut self, limits: ArenaLimits) -> Self {
        self.scratch = limits;
        self
    }

    pub fn with_max_list_elements(mut self, max: usize) -> Self {
        self.max_list_elements = max;
        self
    }
}
