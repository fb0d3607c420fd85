//! Friendly units: archetype capability table, squad/player spawning, and
//! player movement intent handling.

pub mod shield;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::weapon::{Weapon, WeaponKind};
use crate::gameplay::progression::{PlayerClass, SPEED_PER_ATTRIBUTE_POINT};
use crate::gameplay::progression::feedback::PlayerProgression;
use crate::gameplay::{CurrentTarget, Dead, Health, Movement, Target, Team};
use crate::third_party::CollisionLayer;
use crate::{GameSet, GameState, gameplay_running};
use shield::{Shield, ShieldBoostAura, ShieldConfig};

// === Constants ===

/// Collider radius of the player and squad units.
pub const UNIT_RADIUS: f32 = 12.0;

/// The player's shield recharges at this rate (points per second).
const PLAYER_SHIELD_REGEN_RATE: f32 = 5.0;

/// Seconds after a hit before the player's shield recharges.
const PLAYER_SHIELD_REGEN_DELAY_SECS: f32 = 2.0;

/// Formation offsets for the four squad units around the player.
const SQUAD_OFFSETS: [Vec2; 4] = [
    Vec2::new(-60.0, 40.0),
    Vec2::new(60.0, 40.0),
    Vec2::new(-60.0, -40.0),
    Vec2::new(60.0, -40.0),
];

// === Components ===

/// Marker for friendly unit entities (player included).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Unit;

/// Marker for the one player-controlled unit.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

// === Unit Archetype System ===

/// Friendly unit archetypes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum UnitKind {
    Player,
    HeavyShield,
    SpeedyLight,
    AssaultMarine,
    SupportEngineer,
}

impl UnitKind {
    /// The four squad archetypes, in formation order.
    pub const SQUAD: &[Self] = &[
        Self::HeavyShield,
        Self::SpeedyLight,
        Self::AssaultMarine,
        Self::SupportEngineer,
    ];

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::HeavyShield => "Heavy Shield",
            Self::SpeedyLight => "Speedy Light",
            Self::AssaultMarine => "Assault Marine",
            Self::SupportEngineer => "Support Engineer",
        }
    }
}

/// Capability table entry for a unit archetype.
#[derive(Debug, Clone, Copy)]
pub struct UnitSpec {
    pub hp: f32,
    pub move_speed: f32,
    pub shield: ShieldConfig,
    pub weapon: WeaponKind,
}

/// Look up the capability table for an archetype.
///
/// The `Player` row is the class-less baseline; [`spawn_player`] overrides
/// it from the player's class and attribute state.
#[must_use]
pub const fn unit_spec(kind: UnitKind) -> UnitSpec {
    match kind {
        UnitKind::Player => UnitSpec {
            hp: 120.0,
            move_speed: 100.0,
            shield: ShieldConfig {
                max: 75.0,
                regen_rate: PLAYER_SHIELD_REGEN_RATE,
                regen_delay_secs: PLAYER_SHIELD_REGEN_DELAY_SECS,
                damage_reduction: 1.0,
            },
            weapon: WeaponKind::AssaultRifle,
        },
        UnitKind::HeavyShield => UnitSpec {
            hp: 200.0,
            move_speed: 150.0,
            shield: ShieldConfig {
                max: 150.0,
                regen_rate: 5.0,
                regen_delay_secs: 3.0,
                damage_reduction: 0.75,
            },
            weapon: WeaponKind::Shotgun,
        },
        UnitKind::SpeedyLight => UnitSpec {
            hp: 100.0,
            move_speed: 300.0,
            shield: ShieldConfig {
                max: 50.0,
                regen_rate: 10.0,
                regen_delay_secs: 2.0,
                damage_reduction: 1.0,
            },
            weapon: WeaponKind::Smg,
        },
        UnitKind::AssaultMarine => UnitSpec {
            hp: 150.0,
            move_speed: 200.0,
            shield: ShieldConfig {
                max: 100.0,
                regen_rate: 7.0,
                regen_delay_secs: 2.5,
                damage_reduction: 1.0,
            },
            weapon: WeaponKind::AssaultRifle,
        },
        UnitKind::SupportEngineer => UnitSpec {
            hp: 120.0,
            move_speed: 200.0,
            shield: ShieldConfig {
                max: 80.0,
                regen_rate: 6.0,
                regen_delay_secs: 2.5,
                damage_reduction: 1.0,
            },
            weapon: WeaponKind::Pistol,
        },
    }
}

/// Per-class body stats for the player: hit points and weapon choice.
#[must_use]
pub const fn player_body(class: PlayerClass) -> (f32, WeaponKind) {
    match class {
        PlayerClass::Heavy => (200.0, WeaponKind::Shotgun),
        PlayerClass::Light => (100.0, WeaponKind::Smg),
        PlayerClass::Assault => (120.0, WeaponKind::AssaultRifle),
        PlayerClass::Engineer => (90.0, WeaponKind::Pistol),
    }
}

// === Messages ===

/// Host input boundary: the desired movement direction for this tick.
/// Absence of an intent means the player stands still.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerMoveIntent {
    pub direction: Vec2,
}

// === Spawning ===

/// Spawn a friendly squad unit with all required components.
/// Single source of truth for the friendly-unit archetype.
pub fn spawn_unit(commands: &mut Commands, kind: UnitKind, position: Vec2) -> Entity {
    let spec = unit_spec(kind);

    let mut entity = commands.spawn((
        Name::new(kind.display_name()),
        Unit,
        kind,
        Team::Player,
        Target,
        CurrentTarget(None),
        Health::new(spec.hp),
        Shield::new(spec.shield),
        Weapon::new(spec.weapon),
        Movement {
            speed: spec.move_speed,
        },
        Transform::from_translation(position.extend(0.0)),
        DespawnOnExit(GameState::InGame),
    ));
    entity.insert((
        RigidBody::Dynamic,
        Collider::circle(UNIT_RADIUS),
        CollisionLayers::new(
            [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
            [CollisionLayer::Pushbox, CollisionLayer::Hitbox],
        ),
        LockedAxes::ROTATION_LOCKED,
        LinearVelocity::ZERO,
    ));

    if kind == UnitKind::SupportEngineer {
        entity.insert(ShieldBoostAura::default());
    }

    entity.id()
}

/// Spawn the player, parameterized by their class and attribute state.
///
/// Progression state is passed in explicitly so a fresh spawn picks up
/// every upgrade earned so far.
pub fn spawn_player(
    commands: &mut Commands,
    progression: &PlayerProgression,
    position: Vec2,
) -> Entity {
    let attributes = &progression.level_data.attributes;
    let (hp, weapon_kind) = player_body(progression.class);

    let mut weapon = Weapon::new(weapon_kind);
    weapon.update_damage(attributes.damage_per_shot);
    weapon.update_fire_rate(1.0 / attributes.fire_rate);

    commands
        .spawn((
            Name::new("Player"),
            Unit,
            Player,
            UnitKind::Player,
            Team::Player,
            Target,
            CurrentTarget(None),
            Health::new(hp),
            Shield::new(ShieldConfig {
                max: attributes.shield_amount,
                regen_rate: PLAYER_SHIELD_REGEN_RATE,
                regen_delay_secs: PLAYER_SHIELD_REGEN_DELAY_SECS,
                damage_reduction: 1.0,
            }),
            weapon,
            Movement {
                speed: attributes.movement_speed * SPEED_PER_ATTRIBUTE_POINT,
            },
            Transform::from_translation(position.extend(0.0)),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::circle(UNIT_RADIUS),
            // Pickup in the filter so dogtag sensors register the overlap.
            CollisionLayers::new(
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
                [
                    CollisionLayer::Pushbox,
                    CollisionLayer::Hitbox,
                    CollisionLayer::Pickup,
                ],
            ),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
        ))
        .id()
}

// === Systems ===

/// Spawn the player and the four squad units in formation.
fn spawn_squad(mut commands: Commands, progression: Res<PlayerProgression>) {
    spawn_player(&mut commands, &progression, Vec2::ZERO);
    for (kind, offset) in UnitKind::SQUAD.iter().zip(SQUAD_OFFSETS) {
        spawn_unit(&mut commands, *kind, offset);
    }
}

/// Apply the latest move intent to the player's velocity. No intent this
/// tick means the player stops.
fn player_movement(
    mut intents: MessageReader<PlayerMoveIntent>,
    mut players: Query<(&Movement, &mut LinearVelocity), (With<Player>, Without<Dead>)>,
) {
    let direction = intents
        .read()
        .last()
        .map_or(Vec2::ZERO, |intent| intent.direction);
    for (movement, mut velocity) in &mut players {
        velocity.0 = direction.normalize_or_zero() * movement.speed;
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Unit>()
        .register_type::<Player>()
        .register_type::<UnitKind>();

    app.add_message::<PlayerMoveIntent>();

    app.add_systems(OnEnter(GameState::InGame), spawn_squad);
    app.add_systems(
        Update,
        player_movement
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );

    shield::plugin(app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn squad_specs_are_positive() {
        for &kind in UnitKind::SQUAD {
            let spec = unit_spec(kind);
            assert!(spec.hp > 0.0);
            assert!(spec.move_speed > 0.0);
            assert!(spec.shield.max > 0.0);
            assert!(spec.shield.regen_rate > 0.0);
            assert!(spec.shield.damage_reduction > 0.0 && spec.shield.damage_reduction <= 1.0);
        }
    }

    #[test]
    fn heavy_shield_takes_reduced_shield_damage() {
        let spec = unit_spec(UnitKind::HeavyShield);
        assert_eq!(spec.shield.damage_reduction, 0.75);
        assert_eq!(spec.shield.max, 150.0);
    }

    #[test]
    fn class_weapon_mapping() {
        assert_eq!(player_body(PlayerClass::Heavy).1, WeaponKind::Shotgun);
        assert_eq!(player_body(PlayerClass::Light).1, WeaponKind::Smg);
        assert_eq!(player_body(PlayerClass::Assault).1, WeaponKind::AssaultRifle);
        assert_eq!(player_body(PlayerClass::Engineer).1, WeaponKind::Pistol);
    }

    #[test]
    fn display_names_are_distinct() {
        let names: Vec<_> = UnitKind::SQUAD.iter().map(|k| k.display_name()).collect();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
    }
}
