//! Death handling: enemy despawn + experience award, friendly down-state +
//! dogtag drop.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::dogtag;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::progression::feedback::ExperienceGained;
use crate::gameplay::units::{Player, Unit};
use crate::gameplay::{Dead, Health, Target};
use crate::{GameSet, gameplay_running};

/// `SystemSet` for death detection. Other systems can order against this
/// (e.g., `.before(DeathCheck)`) instead of referencing the functions
/// directly.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeathCheck;

// === Systems ===

/// Awards experience for each enemy that is about to die (Health <= 0).
/// Runs BEFORE `DeathCheck` so the entities still exist.
fn award_kill_experience(
    mut experience: MessageWriter<ExperienceGained>,
    enemies: Query<(&Health, &Enemy)>,
) {
    for (health, enemy) in &enemies {
        if health.is_depleted() {
            experience.write(ExperienceGained {
                amount: enemy.experience_value,
            });
        }
    }
}

/// Despawns enemies at zero health.
fn despawn_dead_enemies(mut commands: Commands, enemies: Query<(Entity, &Health), With<Enemy>>) {
    for (entity, health) in &enemies {
        if health.is_depleted() {
            commands.entity(entity).despawn();
        }
    }
}

/// Marks friendly units at zero health as down.
///
/// A downed unit stays in the world (its entity is the respawn handle) but
/// stops moving, leaves the targeting pool, and drops a dogtag where it
/// fell. The player drops no dogtag — there is nothing left to respawn
/// them.
fn check_friendly_death(
    mut commands: Commands,
    mut units: Query<
        (
            Entity,
            &Health,
            &Transform,
            Option<&Player>,
            &mut LinearVelocity,
        ),
        (With<Unit>, Without<Dead>),
    >,
) {
    for (entity, health, transform, player, mut velocity) in &mut units {
        if !health.is_depleted() {
            continue;
        }

        velocity.0 = Vec2::ZERO;
        commands.entity(entity).insert(Dead).remove::<Target>();

        if player.is_none() {
            dogtag::spawn_dogtag(&mut commands, entity, transform.translation.truncate());
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        award_kill_experience
            .in_set(GameSet::Death)
            .before(DeathCheck)
            .run_if(gameplay_running),
    );

    app.add_systems(
        Update,
        (despawn_dead_enemies, check_friendly_death)
            .in_set(DeathCheck)
            .in_set(GameSet::Death)
            .run_if(gameplay_running),
    );
}
