//! Degree-of-freedom limit definitions

use serde::{Deserialize, Serialize};

/// Limits of a degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DofLimits {
    /// Lower position limit (rad or m)
    pub lower: f32,
    /// Upper position limit (rad or m)
    pub upper: f32,
    /// Maximum effort (N or Nm)
    pub effort: f32,
    /// Maximum velocity (rad/s or m/s)
    pub velocity: f32,
}

impl Default for DofLimits {
    fn default() -> Self {
        Self {
            lower: -std::f32::consts::PI,
            upper: std::f32::consts::PI,
            effort: 100.0,
            velocity: 1.0,
        }
    }
}

impl DofLimits {
    /// Default limits for revolute connections (-PI to PI)
    pub fn default_revolute() -> Self {
        Self::default()
    }

    /// Default limits for prismatic connections (-1m to 1m)
    pub fn default_prismatic() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
            effort: 100.0,
            velocity: 1.0,
        }
    }

    /// No position bounds, only a velocity limit
    pub fn unbounded(velocity: f32) -> Self {
        Self {
            lower: f32::NEG_INFINITY,
            upper: f32::INFINITY,
            effort: f32::INFINITY,
            velocity,
        }
    }

    /// Create limits with specified range
    pub fn with_range(lower: f32, upper: f32) -> Self {
        Self {
            lower,
            upper,
            ..Self::default()
        }
    }

    /// Whether a position lies inside `[lower, upper]`
    pub fn contains(&self, position: f32) -> bool {
        position >= self.lower && position <= self.upper
    }

    /// Whether the position range is bounded on both sides
    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let limits = DofLimits::with_range(0.0, 1.0);
        assert!(limits.contains(0.0));
        assert!(limits.contains(1.0));
        assert!(!limits.contains(1.01));
        assert!(!limits.contains(f32::NAN));
    }

    #[test]
    fn test_unbounded() {
        let limits = DofLimits::unbounded(0.5);
        assert!(!limits.is_bounded());
        assert!(limits.contains(1.0e6));
        assert!(DofLimits::default_prismatic().is_bounded());
    }
}
