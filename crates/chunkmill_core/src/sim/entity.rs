//! # Entities
//!
//! Mobile actors living inside a chunk. An entity's kind fixes its health
//! and velocity at construction; only its position changes afterwards.

use chunkmill_shared::Vec3;

/// The closed set of entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    /// Slow ground walker.
    Wanderer,
    /// Fragile, climbs as it moves.
    Flyer,
    /// Ground walker with extra health.
    Volatile,
    /// Tough and fast on every axis.
    Giant,
}

impl EntityKind {
    /// Every kind, in seeding order.
    pub const ALL: [Self; 4] = [Self::Wanderer, Self::Flyer, Self::Volatile, Self::Giant];

    /// Kind assigned to slot `index` when a chunk is seeded.
    #[inline]
    #[must_use]
    pub const fn for_slot(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Starting health.
    #[inline]
    #[must_use]
    pub const fn health(self) -> i32 {
        match self {
            Self::Wanderer => 50,
            Self::Flyer => 25,
            Self::Volatile => 75,
            Self::Giant => 500,
        }
    }

    /// Displacement per tick.
    #[inline]
    #[must_use]
    pub const fn velocity(self) -> Vec3 {
        match self {
            Self::Wanderer => Vec3::new(0.5, 0.0, 0.5),
            Self::Flyer => Vec3::new(0.75, 0.25, 0.75),
            Self::Volatile => Vec3::new(0.75, 0.0, 0.75),
            Self::Giant => Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wanderer => "Wanderer",
            Self::Flyer => "Flyer",
            Self::Volatile => "Volatile",
            Self::Giant => "Giant",
        }
    }
}

/// A mobile actor.
///
/// Fields are private so velocity and health can only come from the kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    position: Vec3,
    velocity: Vec3,
    health: i32,
    kind: EntityKind,
}

impl Entity {
    /// Creates an entity of `kind` at `position`.
    #[inline]
    #[must_use]
    pub const fn new(kind: EntityKind, position: Vec3) -> Self {
        Self {
            position,
            velocity: kind.velocity(),
            health: kind.health(),
            kind,
        }
    }

    /// Advances one full tick.
    #[inline]
    pub fn update(&mut self) {
        self.update_by(1.0);
    }

    /// Advances by `delta` ticks: `position += velocity * delta`.
    #[inline]
    pub fn update_by(&mut self, delta: f32) {
        self.position += self.velocity * delta;
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Velocity fixed by kind.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Health fixed by kind.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_follow_kind() {
        for kind in EntityKind::ALL {
            let entity = Entity::new(kind, Vec3::ZERO);
            assert_eq!(entity.kind(), kind);
            assert_eq!(entity.health(), kind.health());
            assert_eq!(entity.velocity(), kind.velocity());
        }
        assert_eq!(EntityKind::Giant.health(), 500);
        assert_eq!(EntityKind::Flyer.velocity(), Vec3::new(0.75, 0.25, 0.75));
    }

    #[test]
    fn test_update_advances_by_velocity_only() {
        for kind in EntityKind::ALL {
            let start = Vec3::new(3.0, -2.0, 7.0);
            let mut entity = Entity::new(kind, start);
            entity.update();

            assert_eq!(entity.position(), start + kind.velocity());
            assert_eq!(entity.health(), kind.health());
            assert_eq!(entity.velocity(), kind.velocity());
            assert_eq!(entity.kind(), kind);
        }
    }

    #[test]
    fn test_update_by_scales_velocity() {
        let mut entity = Entity::new(EntityKind::Wanderer, Vec3::ZERO);
        entity.update_by(2.0);
        assert_eq!(entity.position(), Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_slot_seeding_cycles_kinds() {
        assert_eq!(EntityKind::for_slot(0), EntityKind::Wanderer);
        assert_eq!(EntityKind::for_slot(1), EntityKind::Flyer);
        assert_eq!(EntityKind::for_slot(2), EntityKind::Volatile);
        assert_eq!(EntityKind::for_slot(3), EntityKind::Giant);
        assert_eq!(EntityKind::for_slot(4), EntityKind::Wanderer);
        assert_eq!(EntityKind::for_slot(999), EntityKind::Giant);
    }

    #[test]
    fn test_names() {
        assert_eq!(EntityKind::Volatile.name(), "Volatile");
    }
}
