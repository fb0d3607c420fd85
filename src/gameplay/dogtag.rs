//! Dogtags: markers dropped where a squad unit fell, gating its timed
//! respawn near the player.

use std::f32::consts::TAU;

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::gameplay::combat::{CombatSet, DeathCheck};
use crate::gameplay::units::shield::Shield;
use crate::gameplay::units::{Player, Unit};
use crate::gameplay::{Dead, Health, Target};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, gameplay_running};

// === Constants ===

/// Fixed respawn delay after a squad unit falls.
pub const RESPAWN_DELAY_SECS: f32 = 10.0;

/// Respawned units reappear this far from the player, at a random angle.
pub const RESPAWN_DISTANCE: f32 = 100.0;

/// Dogtag pickup sensor radius.
const DOGTAG_RADIUS: f32 = 8.0;

// === Components ===

/// A pending respawn for a fallen squad unit.
///
/// Collection by the player is a cosmetic acknowledgment: the respawn
/// timer always runs its full duration regardless.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Dogtag {
    pub fallen: Entity,
    pub collected: bool,
    pub respawn: Timer,
}

// === Spawning ===

/// Drop a dogtag for `fallen` at its death position.
pub fn spawn_dogtag(commands: &mut Commands, fallen: Entity, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Dogtag"),
            Dogtag {
                fallen,
                collected: false,
                respawn: Timer::from_seconds(RESPAWN_DELAY_SECS, TimerMode::Once),
            },
            Transform::from_translation(position.extend(0.0)),
            DespawnOnExit(GameState::InGame),
            RigidBody::Kinematic,
            Collider::circle(DOGTAG_RADIUS),
            Sensor,
            CollisionLayers::new(CollisionLayer::Pickup, CollisionLayer::Pushbox),
            CollisionEventsEnabled,
            CollidingEntities::default(),
        ))
        .id()
}

// === Systems ===

/// Mark a dogtag collected when the player overlaps it. The respawn timer
/// is deliberately untouched.
fn collect_dogtags(
    mut dogtags: Query<(&mut Dogtag, &CollidingEntities)>,
    players: Query<(), (With<Player>, Without<Dead>)>,
) {
    for (mut dogtag, colliding) in &mut dogtags {
        if dogtag.collected {
            continue;
        }
        if colliding.0.iter().any(|&hit| players.get(hit).is_ok()) {
            dogtag.collected = true;
        }
    }
}

/// Respawn fallen units whose dogtag timer has run out: full health and
/// shield, a fresh position near the player, and back into the targeting
/// pool. The fallen entity is re-verified before any mutation; a stale tag
/// is discarded silently.
fn respawn_fallen(
    time: Res<Time>,
    mut commands: Commands,
    mut dogtags: Query<(Entity, &mut Dogtag)>,
    mut fallen_units: Query<
        (
            &mut Health,
            Option<&mut Shield>,
            &mut Transform,
            &mut LinearVelocity,
        ),
        With<Dead>,
    >,
    players: Query<&Transform, (With<Player>, Without<Dead>)>,
) {
    for (tag_entity, mut dogtag) in &mut dogtags {
        dogtag.respawn.tick(time.delta());
        if !dogtag.respawn.just_finished() {
            continue;
        }

        let Ok((mut health, shield, mut transform, mut velocity)) =
            fallen_units.get_mut(dogtag.fallen)
        else {
            warn!("discarding dogtag for missing unit {:?}", dogtag.fallen);
            commands.entity(tag_entity).despawn();
            continue;
        };

        // Anchor on the live player; a downed player leaves the unit where
        // it fell.
        let anchor = players
            .single()
            .map_or(transform.translation.truncate(), |player| {
                player.translation.truncate()
            });
        let angle = rand::rng().random_range(0.0..TAU);
        let position = anchor + Vec2::from_angle(angle) * RESPAWN_DISTANCE;

        health.current = health.max;
        if let Some(mut shield) = shield {
            shield.reset();
        }
        transform.translation = position.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;

        commands.entity(dogtag.fallen).remove::<Dead>().insert(Target);
        commands.entity(tag_entity).despawn();
    }
}

/// The run ends when every friendly unit is down and no respawn is
/// pending.
fn detect_game_over(
    live_units: Query<(), (With<Unit>, Without<Dead>)>,
    dogtags: Query<(), With<Dogtag>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if live_units.is_empty() && dogtags.is_empty() {
        next_state.set(GameState::GameOver);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Dogtag>();

    app.add_systems(
        Update,
        (
            collect_dogtags.in_set(CombatSet::Pickup),
            detect_game_over.in_set(GameSet::Death).after(DeathCheck),
            respawn_fallen.in_set(GameSet::Spawn),
        )
            .run_if(gameplay_running),
    );
}
