use serde::{Deserialize, Serialize};

/// Signature weight class an operation requires from its source account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThresholdLevel {
    Low,
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(ThresholdLevel::Low < ThresholdLevel::Medium);
        assert!(ThresholdLevel::Medium < ThresholdLevel::High);
    }
}
