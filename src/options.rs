use crate::error::{Result, SkipListError};

/// The likelyhood a node of height n will also get height n+1.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Construction parameters for a [`SkipList`](crate::SkipList).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Per-level promotion probability. Must be inside (0, 1).
    pub probability: f64,
    /// Maintain width counters so the list supports positional operations.
    /// Fixed for the lifetime of the list.
    pub indexed: bool,
    /// Seed for height sampling. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            probability: DEFAULT_PROBABILITY,
            indexed: true,
            seed: None,
        }
    }
}

impl Options {
    /// Options for a list without width bookkeeping.
    pub fn unindexed() -> Self {
        Options { indexed: false, ..Options::default() }
    }

    pub fn validate(&self) -> Result<()> {
        // Written this way round so NaN is rejected too.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(SkipListError::InvalidConfiguration(format!(
                "probability must be inside (0, 1), got {}",
                self.probability
            )));
        }
        Ok(())
    }
}
