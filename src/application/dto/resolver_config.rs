//! Resolver configuration DTO

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunables for type resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum magic priority that overrides a disagreeing glob match
    pub magic_threshold: u8,
    /// Upper bound on bytes read from a file for content sniffing
    pub max_sample_size: usize,
    /// Bytes inspected for NUL when deciding between text and binary
    pub text_sniff_len: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            magic_threshold: 80,
            max_sample_size: 16 * 1024, // 16KB
            text_sniff_len: 512,
        }
    }
}

impl ResolverConfig {
    /// Parses a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the magic priority threshold
    pub fn with_magic_threshold(mut self, threshold: u8) -> Self {
        self.magic_threshold = threshold;
        self
    }

    /// Sets the maximum number of bytes sampled from a file
    pub fn with_max_sample_size(mut self, size: usize) -> Self {
        self.max_sample_size = size;
        self
    }

    /// Sets how many leading bytes are checked for NUL
    pub fn with_text_sniff_len(mut self, len: usize) -> Self {
        self.text_sniff_len = len;
        self
    }
}
