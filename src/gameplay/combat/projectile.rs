//! Projectiles: straight-line flight with finite range, live damage lookup
//! through the source weapon, and collision-based hits.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::weapon::Weapon;
use super::{CombatSet, apply_unit_damage};
use crate::gameplay::units::shield::Shield;
use crate::gameplay::{Dead, Health, Team};
use crate::third_party::CollisionLayer;
use crate::{GameState, arena_contains, gameplay_running};

// === Constants ===

/// Projectile collider radius (pixels).
const PROJECTILE_RADIUS: f32 = 3.0;

// === Components ===

/// A projectile in flight.
///
/// Damage is not baked in: at impact it is read from `source_weapon`, so a
/// mid-flight upgrade lands with the new value. `fallback_damage` is the
/// value captured at fire time, used when the owner has since despawned.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub source_weapon: Entity,
    pub fallback_damage: f32,
    pub velocity: Vec2,
    pub origin: Vec2,
    pub range: f32,
}

/// Marker for hitbox sensor entities (attack colliders that damage
/// hurtbox targets).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hitbox;

// === Spawning ===

/// Spawn a projectile leaving `origin` at `angle`, owned by the weapon on
/// `shooter`.
pub fn spawn_projectile(
    commands: &mut Commands,
    shooter: Entity,
    weapon: &Weapon,
    origin: Vec2,
    angle: f32,
    team: Team,
) -> Entity {
    commands
        .spawn((
            Name::new("Projectile"),
            Projectile {
                source_weapon: shooter,
                fallback_damage: weapon.damage,
                velocity: Vec2::from_angle(angle) * weapon.projectile_speed,
                origin,
                range: weapon.range,
            },
            team,
            Hitbox,
            Transform::from_translation(origin.extend(0.0)),
            DespawnOnExit(GameState::InGame),
            // Physics: sensor hitbox for collision-based damage
            RigidBody::Kinematic,
            Collider::circle(PROJECTILE_RADIUS),
            Sensor,
            CollisionLayers::new(CollisionLayer::Hitbox, CollisionLayer::Hurtbox),
            CollisionEventsEnabled,
            CollidingEntities::default(),
        ))
        .id()
}

// === Systems ===

/// Fly projectiles in a straight line and deactivate the spent ones.
///
/// A projectile despawns only once its distance from the firing point
/// reaches its range, or its position leaves the arena — never earlier.
fn move_projectiles(
    time: Res<Time>,
    mut commands: Commands,
    mut projectiles: Query<(Entity, &Projectile, &mut Transform)>,
) {
    for (entity, projectile, mut transform) in &mut projectiles {
        transform.translation += (projectile.velocity * time.delta_secs()).extend(0.0);

        let position = transform.translation.truncate();
        if position.distance(projectile.origin) >= projectile.range || !arena_contains(position) {
            commands.entity(entity).despawn();
        }
    }
}

/// Check projectile hitbox overlaps with hurtboxes via `CollidingEntities`.
/// Damages the first live opposing-team entity hit (shield first) and
/// despawns the projectile.
fn handle_projectile_hits(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile, &Team, &CollidingEntities), With<Hitbox>>,
    mut targets: Query<(&Team, Option<&mut Shield>, &mut Health), Without<Dead>>,
    weapons: Query<&Weapon>,
) {
    for (entity, projectile, projectile_team, colliding) in &projectiles {
        for &hit in &colliding.0 {
            let Ok((hit_team, shield, mut health)) = targets.get_mut(hit) else {
                continue;
            };
            // No friendly fire
            if hit_team == projectile_team {
                continue;
            }

            let damage = resolve_damage(projectile, &weapons);
            apply_unit_damage(shield.map(Mut::into_inner), &mut health, damage);
            commands.entity(entity).despawn();
            break; // One hit per projectile
        }
    }
}

/// Current damage of the source weapon, or the fire-time fallback when the
/// owner no longer exists.
fn resolve_damage(projectile: &Projectile, weapons: &Query<&Weapon>) -> f32 {
    weapons
        .get(projectile.source_weapon)
        .map_or(projectile.fallback_damage, |weapon| weapon.damage)
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>().register_type::<Hitbox>();

    // chain_ignore_deferred so a projectile spawned this frame does not
    // move or hit until the next frame.
    app.add_systems(
        Update,
        (move_projectiles, handle_projectile_hits)
            .chain_ignore_deferred()
            .in_set(CombatSet::Projectiles)
            .run_if(gameplay_running),
    );
}
