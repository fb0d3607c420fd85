//! Gameplay domain plugins: units, combat, enemy waves, dogtags, progression.

pub mod combat;
pub mod dogtag;
pub mod enemies;
pub mod progression;
pub mod units;

use bevy::prelude::*;

// === Shared Components ===

/// Which side an entity fights for.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Team {
    /// The player and their squad units.
    Player,
    /// Wave-spawned enemies.
    Enemy,
}

impl Team {
    /// The team this team fights against.
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Hit points. Shields absorb damage before health does — see
/// [`combat::apply_unit_damage`].
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// Movement speed (pixels per second).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Movement {
    pub speed: f32,
}

/// Marker: this entity can be selected as a target.
/// Removed while a unit is [`Dead`] so targeting skips it.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Target;

/// The entity currently being pursued/attacked, if any.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CurrentTarget(pub Option<Entity>);

/// Marker: this unit is down. It takes no damage, acts on nothing, and is
/// excluded from targeting, but stays addressable for a pending respawn.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Dead;

// === Plugin ===

pub fn plugin(app: &mut App) {
    app.register_type::<Team>()
        .register_type::<Health>()
        .register_type::<Movement>()
        .register_type::<Target>()
        .register_type::<CurrentTarget>()
        .register_type::<Dead>();

    app.add_plugins((
        units::plugin,
        combat::plugin,
        enemies::plugin,
        dogtag::plugin,
        progression::plugin,
    ));
}
