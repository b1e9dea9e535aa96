//! Degrees of freedom driving connection transforms

use serde::{Deserialize, Serialize};

use crate::types::{DofLimits, PrefixedName};

/// A named scalar parameter owned by exactly one connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeOfFreedom {
    pub name: PrefixedName,
    pub limits: DofLimits,
    /// Current position (rad or m)
    pub(crate) position: f32,
}

impl DegreeOfFreedom {
    /// Create a DoF at the position closest to zero inside its limits
    pub fn new(name: PrefixedName, limits: DofLimits) -> Self {
        let position = 0.0_f32.max(limits.lower).min(limits.upper);
        Self {
            name,
            limits,
            position,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }
}
