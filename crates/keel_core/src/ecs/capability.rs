//! # Capabilities
//!
//! The closed set of component types an entity can own, one instance each.
//! The tag doubles as the index into the entity's ownership slots and into
//! the factory's dispatch table.

use std::fmt;

/// A component capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Capability {
    /// Movement intent.
    Actor = 0,
    /// Camera projection.
    Camera = 1,
    /// Light parameters.
    Light = 2,
    /// Render mesh binding.
    Model = 3,
    /// Physics actor binding.
    Physics = 4,
    /// Spatial transform.
    Scene = 5,
}

impl Capability {
    /// Number of capabilities.
    pub const COUNT: usize = 6;

    /// Every capability, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Actor,
        Self::Camera,
        Self::Light,
        Self::Model,
        Self::Physics,
        Self::Scene,
    ];

    /// Dense index of this capability (0..COUNT).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name, used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Camera => "camera",
            Self::Light => "light",
            Self::Model => "model",
            Self::Physics => "physics",
            Self::Scene => "scene",
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitmask of capabilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Set containing every capability in `capabilities`.
    #[must_use]
    pub const fn of(capabilities: &[Capability]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < capabilities.len() {
            bits |= capabilities[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Whether `capability` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Whether every member of `other` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Adds a capability.
    #[inline]
    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    /// Removes a capability.
    #[inline]
    pub fn remove(&mut self, capability: Capability) {
        self.0 &= !capability.bit();
    }

    /// Whether the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members, in index order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, capability) in Capability::ALL.iter().enumerate() {
            assert_eq!(capability.index(), i);
        }
    }

    #[test]
    fn test_set_membership() {
        let required = CapabilitySet::of(&[Capability::Physics, Capability::Scene]);
        let mut owned = CapabilitySet::of(&[Capability::Scene]);
        assert!(!owned.contains_all(required));

        owned.insert(Capability::Physics);
        owned.insert(Capability::Camera);
        assert!(owned.contains_all(required));
        assert_eq!(
            owned.iter().collect::<Vec<_>>(),
            vec![Capability::Camera, Capability::Physics, Capability::Scene]
        );

        owned.remove(Capability::Physics);
        assert!(!owned.contains(Capability::Physics));
        assert!(CapabilitySet::EMPTY.is_empty());
    }
}
