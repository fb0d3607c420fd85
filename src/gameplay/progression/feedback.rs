//! The feedback edge of the leveling system: experience intake and
//! attribute upgrades that re-parameterize the live player entity.
//!
//! Inbound messages are drained once per tick at the progression stage,
//! so state transitions delivered by the relay land atomically between
//! simulation ticks, never mid-tick.

use bevy::prelude::*;

use super::{
    Attribute, AttributeUpgrade, LevelData, PlayerClass, SPEED_PER_ATTRIBUTE_POINT,
    add_experience, initialize_level_data, upgrade_attribute,
};
use crate::gameplay::Movement;
use crate::gameplay::combat::weapon::Weapon;
use crate::gameplay::units::Player;
use crate::gameplay::units::shield::Shield;
use crate::{GameSet, gameplay_running};

// === Resources ===

/// The local player's class and leveling state. Passed explicitly into
/// spawning so a fresh player entity picks up every upgrade earned so far.
#[derive(Resource, Debug, Clone)]
pub struct PlayerProgression {
    pub class: PlayerClass,
    pub level_data: LevelData,
}

impl PlayerProgression {
    #[must_use]
    pub const fn new(class: PlayerClass) -> Self {
        Self {
            class,
            level_data: initialize_level_data(class),
        }
    }
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self::new(PlayerClass::default())
    }
}

// === Messages ===

/// Experience earned, typically from an enemy kill.
#[derive(Message, Debug, Clone, Copy)]
pub struct ExperienceGained {
    pub amount: u32,
}

/// Emitted once per level crossed.
#[derive(Message, Debug, Clone, Copy)]
pub struct LevelGained {
    pub new_level: u32,
    pub available_points: u32,
}

/// A request to spend attribute points, from the host UI or the relay.
#[derive(Message, Debug, Clone, Copy)]
pub struct UpgradeRequest {
    pub attribute: Attribute,
    pub amount: u32,
}

/// A successful upgrade, already applied to the live player.
#[derive(Message, Debug, Clone, Copy)]
pub struct AttributeUpgraded(pub AttributeUpgrade);

/// A rejected upgrade. Nothing was mutated.
#[derive(Message, Debug, Clone)]
pub struct UpgradeFailed {
    pub message: String,
}

// === Systems ===

/// Fold experience grants into the progression state, announcing each
/// level crossed.
fn apply_experience(
    mut grants: MessageReader<ExperienceGained>,
    mut progression: ResMut<PlayerProgression>,
    mut level_ups: MessageWriter<LevelGained>,
) {
    for grant in grants.read() {
        let gained = add_experience(&mut progression.level_data, grant.amount);
        for step in 0..gained {
            level_ups.write(LevelGained {
                new_level: progression.level_data.current_level - gained + step + 1,
                available_points: progression.level_data.available_attribute_points,
            });
        }
    }
}

/// Resolve upgrade requests against the progression state and push
/// successful ones into the live player entity.
fn apply_attribute_upgrades(
    mut requests: MessageReader<UpgradeRequest>,
    mut progression: ResMut<PlayerProgression>,
    mut players: Query<(&mut Weapon, &mut Movement, Option<&mut Shield>), With<Player>>,
    mut upgraded: MessageWriter<AttributeUpgraded>,
    mut failed: MessageWriter<UpgradeFailed>,
) {
    for request in requests.read() {
        match upgrade_attribute(&mut progression.level_data, request.attribute, request.amount) {
            Ok(upgrade) => {
                for (mut weapon, mut movement, shield) in &mut players {
                    match upgrade.attribute {
                        Attribute::DamagePerShot => weapon.update_damage(upgrade.new_value),
                        Attribute::FireRate => weapon.update_fire_rate(1.0 / upgrade.new_value),
                        Attribute::MovementSpeed => {
                            movement.speed = upgrade.new_value * SPEED_PER_ATTRIBUTE_POINT;
                        }
                        Attribute::ShieldAmount => match shield {
                            Some(mut shield) => shield.update_max(upgrade.new_value),
                            None => warn!("player has no shield to upgrade"),
                        },
                    }
                }
                upgraded.write(AttributeUpgraded(upgrade));
            }
            Err(error) => {
                failed.write(UpgradeFailed {
                    message: error.to_string(),
                });
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerProgression>();

    app.add_message::<ExperienceGained>();
    app.add_message::<LevelGained>();
    app.add_message::<UpgradeRequest>();
    app.add_message::<AttributeUpgraded>();
    app.add_message::<UpgradeFailed>();

    app.add_systems(
        Update,
        (apply_experience, apply_attribute_upgrades)
            .chain()
            .in_set(GameSet::Progression)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::combat::weapon::WeaponKind;
    use crate::gameplay::units::shield::ShieldConfig;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_progression_test_app(class: PlayerClass) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(PlayerProgression::new(class));
        app.add_message::<ExperienceGained>();
        app.add_message::<LevelGained>();
        app.add_message::<UpgradeRequest>();
        app.add_message::<AttributeUpgraded>();
        app.add_message::<UpgradeFailed>();
        app.add_systems(Update, (apply_experience, apply_attribute_upgrades).chain());
        app
    }

    fn spawn_live_player(world: &mut World) -> Entity {
        world
            .spawn((
                Player,
                Weapon::new(WeaponKind::Pistol),
                Movement { speed: 120.0 },
                Shield::new(ShieldConfig {
                    max: 60.0,
                    regen_rate: 5.0,
                    regen_delay_secs: 2.0,
                    damage_reduction: 1.0,
                }),
            ))
            .id()
    }

    fn grant_points(app: &mut App, points: u32) {
        app.world_mut()
            .resource_mut::<PlayerProgression>()
            .level_data
            .available_attribute_points = points;
    }

    #[test]
    fn experience_message_levels_the_resource() {
        let mut app = create_progression_test_app(PlayerClass::Assault);
        app.world_mut().write_message(ExperienceGained { amount: 100 });

        app.update();

        let progression = app.world().resource::<PlayerProgression>();
        assert_eq!(progression.level_data.current_level, 2);
        assert_eq!(progression.level_data.available_attribute_points, 1);

        let level_ups: Vec<u32> = app
            .world_mut()
            .resource_mut::<Messages<LevelGained>>()
            .drain()
            .map(|m| m.new_level)
            .collect();
        assert_eq!(level_ups, vec![2]);
    }

    #[test]
    fn one_large_grant_announces_every_level() {
        let mut app = create_progression_test_app(PlayerClass::Assault);
        app.world_mut().write_message(ExperienceGained { amount: 350 });

        app.update();

        let level_ups: Vec<u32> = app
            .world_mut()
            .resource_mut::<Messages<LevelGained>>()
            .drain()
            .map(|m| m.new_level)
            .collect();
        assert_eq!(level_ups, vec![2, 3]);
    }

    #[test]
    fn damage_upgrade_rewrites_the_live_weapon() {
        let mut app = create_progression_test_app(PlayerClass::Engineer);
        let player = spawn_live_player(app.world_mut());
        grant_points(&mut app, 1);

        app.world_mut().write_message(UpgradeRequest {
            attribute: Attribute::DamagePerShot,
            amount: 1,
        });
        app.update();

        let weapon = app.world().get::<Weapon>(player).unwrap();
        assert_eq!(weapon.damage, 12.0); // engineer baseline 10 + perPoint 2
    }

    #[test]
    fn fire_rate_upgrade_shortens_the_cooldown() {
        let mut app = create_progression_test_app(PlayerClass::Engineer);
        let player = spawn_live_player(app.world_mut());
        grant_points(&mut app, 1);

        app.world_mut().write_message(UpgradeRequest {
            attribute: Attribute::FireRate,
            amount: 1,
        });
        app.update();

        // Engineer fire rate 1.2 + 0.2 = 1.4 shots/sec → 1/1.4 s interval.
        let weapon = app.world().get::<Weapon>(player).unwrap();
        assert_eq!(
            weapon.cooldown.duration(),
            Duration::from_secs_f32(1.0 / 1.4)
        );
    }

    #[test]
    fn movement_upgrade_scales_into_pixels_per_second() {
        let mut app = create_progression_test_app(PlayerClass::Engineer);
        let player = spawn_live_player(app.world_mut());
        grant_points(&mut app, 2);

        app.world_mut().write_message(UpgradeRequest {
            attribute: Attribute::MovementSpeed,
            amount: 2,
        });
        app.update();

        // 6.0 + 2 * 0.5 = 7.0 attribute points → 140 px/s.
        let movement = app.world().get::<Movement>(player).unwrap();
        assert_eq!(movement.speed, 140.0);
    }

    #[test]
    fn shield_upgrade_rescales_the_live_shield() {
        let mut app = create_progression_test_app(PlayerClass::Engineer);
        let player = spawn_live_player(app.world_mut());
        grant_points(&mut app, 1);
        app.world_mut()
            .get_mut::<Shield>(player)
            .unwrap()
            .take_damage(30.0); // 30/60 charge

        app.world_mut().write_message(UpgradeRequest {
            attribute: Attribute::ShieldAmount,
            amount: 1,
        });
        app.update();

        let shield = app.world().get::<Shield>(player).unwrap();
        assert_eq!(shield.max, 70.0); // engineer baseline 60 + perPoint 10
        assert_eq!(shield.current, 35.0); // half charge preserved
    }

    #[test]
    fn rejected_upgrade_mutates_nothing_and_reports() {
        let mut app = create_progression_test_app(PlayerClass::Engineer);
        let player = spawn_live_player(app.world_mut());
        // No points granted.

        app.world_mut().write_message(UpgradeRequest {
            attribute: Attribute::DamagePerShot,
            amount: 1,
        });
        app.update();

        let weapon = app.world().get::<Weapon>(player).unwrap();
        assert_eq!(weapon.damage, 40.0); // untouched pistol damage

        let failures: Vec<String> = app
            .world_mut()
            .resource_mut::<Messages<UpgradeFailed>>()
            .drain()
            .map(|m| m.message)
            .collect();
        assert_eq!(failures, vec!["not enough attribute points available"]);
    }
}
