//! # Collision Masks
//!
//! A collision type is a bitmask: one "solid" bit plus team/category bits.
//! The kernel only interprets the solid bit. Team rules belong to entities.

use serde::{Deserialize, Serialize};

/// Collision bitmask carried by every entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CollisionType(u32);

impl CollisionType {
    /// No bits set. Never indexed, never collides.
    pub const NONE: Self = Self(0);
    /// Participates in solid collision.
    pub const SOLID: Self = Self(1);
    /// Player-side team bit.
    pub const TEAM_PLAYER: Self = Self(1 << 1);
    /// Enemy-side team bit.
    pub const TEAM_ENEMY: Self = Self(1 << 2);
    /// Unaligned objects (asteroids, debris).
    pub const TEAM_NEUTRAL: Self = Self(1 << 3);
    /// Union of all team bits.
    pub const TEAMS: Self = Self((1 << 1) | (1 << 2) | (1 << 3));

    /// Creates a mask from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share at least one bit.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when the solid bit is set.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.contains(Self::SOLID)
    }

    /// The team bits only.
    #[inline]
    #[must_use]
    pub const fn team(self) -> Self {
        Self(self.0 & Self::TEAMS.0)
    }

    /// Returns `self` with the bits of `other` added.
    #[inline]
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` with the bits of `other` cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// True when the team bits of both masks differ.
    #[inline]
    #[must_use]
    pub const fn opposes(self, other: Self) -> bool {
        self.team().0 != other.team().0
    }
}

impl std::ops::BitOr for CollisionType {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl std::ops::BitOrAssign for CollisionType {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.with(rhs);
    }
}

impl std::ops::BitAnd for CollisionType {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
