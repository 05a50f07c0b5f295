use crate::jump::JumpStrategy;
use crate::program::DEFAULT_CAPACITY;

/// Configuration for a single interpreter run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum program size in bytes.
    pub program_capacity: usize,
    /// Number of tape cells. Values below 1 are raised to 1.
    pub tape_len: usize,
    /// How taken jumps find their matching bracket.
    pub jumps: JumpStrategy,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            program_capacity: DEFAULT_CAPACITY,
            tape_len: DEFAULT_CAPACITY,
            jumps: JumpStrategy::Rescan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_historical_limits() {
        let config = VmConfig::default();
        assert_eq!(config.program_capacity, 30_000);
        assert_eq!(config.tape_len, 30_000);
        assert_eq!(config.jumps, JumpStrategy::Rescan);
    }
}
