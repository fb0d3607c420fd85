//! Enemies: kind stat tables with wave scaling, targeting, pursuit, and
//! contact damage.

pub mod waves;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::{CombatSet, apply_unit_damage};
use crate::gameplay::units::shield::Shield;
use crate::gameplay::{CurrentTarget, Dead, Health, Movement, Target, Team};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, gameplay_running};

// === Constants ===

/// Collider radius of an enemy.
pub const ENEMY_RADIUS: f32 = 10.0;

// === Enemy Type System ===

/// Enemy variants with distinct base stat rows.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum EnemyKind {
    Fast,
    Normal,
    Heavy,
}

impl EnemyKind {
    /// All enemy kinds, in wave-weight order.
    pub const ALL: &[Self] = &[Self::Fast, Self::Normal, Self::Heavy];
}

/// Wave-1 base stats for an enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemyBase {
    pub hp: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub experience: u32,
    /// Seconds between contact damage applications.
    pub damage_interval_secs: f32,
}

/// Resolved stats for an enemy of `kind` spawned on `wave`.
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub hp: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub experience: u32,
    pub damage_interval_secs: f32,
}

/// Base stat row for an enemy kind.
#[must_use]
pub const fn enemy_base(kind: EnemyKind) -> EnemyBase {
    match kind {
        EnemyKind::Fast => EnemyBase {
            hp: 30.0,
            speed: 140.0,
            contact_damage: 5.0,
            experience: 8,
            damage_interval_secs: 1.0,
        },
        EnemyKind::Normal => EnemyBase {
            hp: 50.0,
            speed: 100.0,
            contact_damage: 10.0,
            experience: 10,
            damage_interval_secs: 1.0,
        },
        EnemyKind::Heavy => EnemyBase {
            hp: 120.0,
            speed: 60.0,
            contact_damage: 20.0,
            experience: 25,
            damage_interval_secs: 1.5,
        },
    }
}

/// Scale a kind's base stats linearly with the wave number (1-based):
/// health and experience multiply, speed and contact damage climb by a
/// fixed step per wave.
#[must_use]
pub fn enemy_stats(kind: EnemyKind, wave: u32) -> EnemyStats {
    let base = enemy_base(kind);
    let wave = wave.max(1);
    let steps = (wave - 1) as f32;
    EnemyStats {
        hp: base.hp * wave as f32,
        speed: 10.0f32.mul_add(steps, base.speed),
        contact_damage: 2.0f32.mul_add(steps, base.contact_damage),
        experience: base.experience * wave,
        damage_interval_secs: base.damage_interval_secs,
    }
}

// === Components ===

/// A wave-spawned enemy. The damage timer throttles contact damage to one
/// application per interval, shared across all of this enemy's victims.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub contact_damage: f32,
    pub experience_value: u32,
    pub damage_timer: Timer,
}

// === Spawning ===

/// Spawn an enemy of `kind`, scaled for `wave`, with all required
/// components. Single source of truth for the enemy archetype.
pub fn spawn_enemy(commands: &mut Commands, kind: EnemyKind, wave: u32, position: Vec2) -> Entity {
    let stats = enemy_stats(kind, wave);

    let mut damage_timer = Timer::from_seconds(stats.damage_interval_secs, TimerMode::Once);
    let duration = damage_timer.duration();
    damage_timer.tick(duration); // first touch hits immediately

    commands
        .spawn((
            Name::new(format!("{kind:?} Enemy")),
            Enemy {
                kind,
                contact_damage: stats.contact_damage,
                experience_value: stats.experience,
                damage_timer,
            },
            kind,
            Team::Enemy,
            Target,
            CurrentTarget(None),
            Health::new(stats.hp),
            Movement { speed: stats.speed },
            Transform::from_translation(position.extend(0.0)),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::circle(ENEMY_RADIUS),
            CollisionLayers::new(
                [
                    CollisionLayer::Pushbox,
                    CollisionLayer::Hitbox,
                    CollisionLayer::Hurtbox,
                ],
                [
                    CollisionLayer::Pushbox,
                    CollisionLayer::Hitbox,
                    CollisionLayer::Hurtbox,
                ],
            ),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
            CollisionEventsEnabled,
            CollidingEntities::default(),
        ))
        .id()
}

// === Systems ===

/// Pick the nearest live friendly target for every enemy, re-evaluated
/// each tick. Downed units have no `Target` component and are skipped by
/// construction.
fn find_enemy_target(
    mut enemies: Query<(&Transform, &mut CurrentTarget), With<Enemy>>,
    targets: Query<(Entity, &Transform, &Team), With<Target>>,
) {
    for (enemy_transform, mut current) in &mut enemies {
        let origin = enemy_transform.translation.truncate();
        let mut nearest: Option<(Entity, f32)> = None;
        for (entity, transform, team) in &targets {
            if *team != Team::Player {
                continue;
            }
            let distance = origin.distance(transform.translation.truncate());
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((entity, distance));
            }
        }
        current.0 = nearest.map(|(entity, _)| entity);
    }
}

/// Steer each enemy straight at its current target. Enemies with no target
/// stand still.
fn enemy_movement(
    mut enemies: Query<(&Transform, &CurrentTarget, &Movement, &mut LinearVelocity), With<Enemy>>,
    positions: Query<&Transform, Without<Enemy>>,
) {
    for (transform, target, movement, mut velocity) in &mut enemies {
        let Some(position) = target.0.and_then(|entity| positions.get(entity).ok()) else {
            velocity.0 = Vec2::ZERO;
            continue;
        };

        let direction = position.translation.truncate() - transform.translation.truncate();
        velocity.0 = direction.normalize_or_zero() * movement.speed;
    }
}

/// Apply contact damage on collider overlap, at most once per enemy per
/// damage interval. The interval is per enemy, not per victim: one timer
/// throttles an enemy touching several units at once.
fn contact_damage(
    time: Res<Time>,
    mut enemies: Query<(&mut Enemy, &CollidingEntities)>,
    mut victims: Query<(&Team, Option<&mut Shield>, &mut Health), Without<Dead>>,
) {
    for (mut enemy, colliding) in &mut enemies {
        enemy.damage_timer.tick(time.delta());
        if !enemy.damage_timer.is_finished() {
            continue;
        }

        for &hit in &colliding.0 {
            let Ok((team, shield, mut health)) = victims.get_mut(hit) else {
                continue;
            };
            if *team != Team::Player {
                continue;
            }

            apply_unit_damage(shield.map(Mut::into_inner), &mut health, enemy.contact_damage);
            enemy.damage_timer.reset();
            break; // one victim per interval
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>().register_type::<EnemyKind>();

    app.add_systems(
        Update,
        (
            find_enemy_target.in_set(GameSet::Ai),
            enemy_movement.in_set(GameSet::Movement),
            contact_damage.in_set(CombatSet::Contact),
        )
            .run_if(gameplay_running),
    );

    waves::plugin(app);
}
