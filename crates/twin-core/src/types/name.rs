//! Prefixed names identify bodies, connections and degrees of freedom

use std::fmt;

use serde::{Deserialize, Serialize};

/// A name with an optional namespace prefix, displayed as `prefix/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrefixedName {
    pub name: String,
    pub prefix: Option<String>,
}

impl PrefixedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Derive a name in the same namespace by appending a suffix
    pub fn child(&self, suffix: &str) -> Self {
        Self {
            name: format!("{}_{}", self.name, suffix),
            prefix: self.prefix.clone(),
        }
    }
}

impl fmt::Display for PrefixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}/{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for PrefixedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PrefixedName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PrefixedName::new("door").to_string(), "door");
        assert_eq!(PrefixedName::with_prefix("door", "kitchen").to_string(), "kitchen/door");
    }

    #[test]
    fn test_child_keeps_prefix() {
        let name = PrefixedName::with_prefix("root_T_door", "kitchen");
        let dof = name.child("angle");
        assert_eq!(dof.name, "root_T_door_angle");
        assert_eq!(dof.prefix.as_deref(), Some("kitchen"));
    }
}
