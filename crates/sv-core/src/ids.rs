use serde::{Deserialize, Serialize};
use std::fmt;

/// Display label of the synthetic indie publisher bucket.
pub const INDIE_LABEL: &str = "Indie";

/// Steam application id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppId(pub u64);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a publisher bubble.
///
/// The indie bucket is its own variant so that a real publisher literally
/// named "Indie" can never collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublisherKey {
    Named(String),
    Indie,
}

impl PublisherKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_indie(&self) -> bool {
        matches!(self, Self::Indie)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Indie => INDIE_LABEL,
        }
    }
}

impl fmt::Display for PublisherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indie_key_is_distinct_from_named_indie() {
        assert_ne!(PublisherKey::Indie, PublisherKey::named("Indie"));
        assert_eq!(PublisherKey::Indie.label(), PublisherKey::named("Indie").label());
    }
}
