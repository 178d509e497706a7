//! Reward policies applied to completed tool calls.

use serde::{Deserialize, Serialize};

/// How a tool turns a finished call into a scalar reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardPolicy {
    /// Same reward for every call.
    Constant { value: f64 },
    /// `hit` when the result contains `marker`, otherwise `miss`.
    Marker { marker: String, hit: f64, miss: f64 },
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::Constant { value: 0.0 }
    }
}

impl RewardPolicy {
    pub fn score(&self, result: &str) -> f64 {
        match self {
            Self::Constant { value } => *value,
            Self::Marker { marker, hit, miss } => {
                if result.contains(marker.as_str()) {
                    *hit
                } else {
                    *miss
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_for_anything() {
        let policy = RewardPolicy::default();
        assert_eq!(policy.score("results: [...]"), 0.0);
        assert_eq!(policy.score(""), 0.0);
    }

    #[test]
    fn marker_policy_checks_presence() {
        let policy = RewardPolicy::Marker {
            marker: "<DOC>".into(),
            hit: 1.0,
            miss: 0.0,
        };
        assert_eq!(policy.score("<DOC>\nx\n</DOC>\n\n"), 1.0);
        assert_eq!(policy.score("No References"), 0.0);
    }
}
