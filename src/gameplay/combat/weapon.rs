//! Weapons: per-archetype stat tables, fire-rate gating, and spread math.

use std::f32::consts::PI;
use std::time::Duration;

use avian2d::prelude::Collider;
use bevy::prelude::*;
use rand::Rng;

use super::{CombatSet, projectile};
use crate::gameplay::units::Player;
use crate::gameplay::{Dead, Target, Team};
use crate::gameplay_running;
use crate::third_party::surface_distance;

// === Weapon Archetypes ===

/// Weapon archetypes carried by units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum WeaponKind {
    AssaultRifle,
    Smg,
    Shotgun,
    Pistol,
}

impl WeaponKind {
    /// All weapon kinds, for iteration.
    pub const ALL: &[Self] = &[Self::AssaultRifle, Self::Smg, Self::Shotgun, Self::Pistol];

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AssaultRifle => "Assault Rifle",
            Self::Smg => "SMG",
            Self::Shotgun => "Shotgun",
            Self::Pistol => "Pistol",
        }
    }
}

/// Stats for a weapon kind. All values are compile-time constants.
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    pub damage: f32,
    pub projectile_speed: f32,
    pub range: f32,
    /// Seconds between shots.
    pub fire_interval_secs: f32,
    /// Total spread arc in radians.
    pub spread: f32,
    /// Projectiles per trigger pull.
    pub projectile_count: u32,
}

/// Look up stats for a weapon kind.
#[must_use]
pub const fn weapon_stats(kind: WeaponKind) -> WeaponStats {
    match kind {
        WeaponKind::AssaultRifle => WeaponStats {
            damage: 35.0,
            projectile_speed: 800.0,
            range: 800.0,
            fire_interval_secs: 0.5,
            spread: PI / 64.0,
            projectile_count: 1,
        },
        WeaponKind::Smg => WeaponStats {
            damage: 15.0,
            projectile_speed: 700.0,
            range: 500.0,
            fire_interval_secs: 0.15,
            spread: PI / 32.0,
            projectile_count: 1,
        },
        WeaponKind::Shotgun => WeaponStats {
            damage: 15.0,
            projectile_speed: 500.0,
            range: 300.0,
            fire_interval_secs: 0.8,
            spread: PI / 8.0,
            projectile_count: 5,
        },
        WeaponKind::Pistol => WeaponStats {
            damage: 40.0,
            projectile_speed: 650.0,
            range: 500.0,
            fire_interval_secs: 0.7,
            spread: PI / 48.0,
            projectile_count: 1,
        },
    }
}

// === Components ===

/// A unit's weapon: live stats plus the fire-rate cooldown.
///
/// `damage` and the cooldown duration are mutable at runtime — the
/// attribute-upgrade feedback path rewrites them on a live entity, and
/// in-flight projectiles read `damage` at impact time.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage: f32,
    pub projectile_speed: f32,
    pub range: f32,
    pub spread: f32,
    pub projectile_count: u32,
    pub cooldown: Timer,
}

impl Weapon {
    /// A weapon of the given kind, ready to fire immediately.
    #[must_use]
    pub fn new(kind: WeaponKind) -> Self {
        let stats = weapon_stats(kind);
        let mut cooldown = Timer::from_seconds(stats.fire_interval_secs, TimerMode::Once);
        let duration = cooldown.duration();
        cooldown.tick(duration);
        Self {
            kind,
            damage: stats.damage,
            projectile_speed: stats.projectile_speed,
            range: stats.range,
            spread: stats.spread,
            projectile_count: stats.projectile_count,
            cooldown,
        }
    }

    /// Replace the live damage value. In-flight projectiles pick this up
    /// at impact.
    pub fn update_damage(&mut self, damage: f32) {
        self.damage = damage;
    }

    /// Replace the fire interval. The current cooldown's progress is kept.
    pub fn update_fire_rate(&mut self, interval_secs: f32) {
        self.cooldown
            .set_duration(Duration::from_secs_f32(interval_secs));
    }
}

// === Messages ===

/// A request for `shooter` to fire toward a world position. Dropped
/// silently when the shooter's cooldown has not elapsed.
#[derive(Message, Debug, Clone, Copy)]
pub struct FireRequest {
    pub shooter: Entity,
    pub target: Vec2,
}

/// Host input boundary: the player wants to fire at a world position.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerFireIntent {
    pub target: Vec2,
}

// === Spread math ===

/// Symmetric fan of `count` angles across `spread`, centered on `aim`.
/// The first pellet leaves at `aim - spread/2`, the last at `aim + spread/2`.
fn fan_angles(aim: f32, spread: f32, count: u32) -> impl Iterator<Item = f32> {
    let step = spread / (count - 1) as f32;
    let start = aim - spread / 2.0;
    (0..count).map(move |i| step.mul_add(i as f32, start))
}

// === Systems ===

/// Keep every cooldown warm so `finished()` reflects real elapsed time.
fn tick_weapon_cooldowns(time: Res<Time>, mut weapons: Query<&mut Weapon>) {
    for mut weapon in &mut weapons {
        weapon.cooldown.tick(time.delta());
    }
}

/// Turn player fire intents into fire requests for the player entity.
fn relay_player_fire_intents(
    mut intents: MessageReader<PlayerFireIntent>,
    mut requests: MessageWriter<FireRequest>,
    players: Query<Entity, (With<Player>, Without<Dead>)>,
) {
    for intent in intents.read() {
        for player in &players {
            requests.write(FireRequest {
                shooter: player,
                target: intent.target,
            });
        }
    }
}

/// Squad units fire at the nearest opposing target within weapon range,
/// measured surface to surface. Requests are only issued when the cooldown
/// is up, so a unit does not spam dropped requests between shots.
fn auto_fire(
    mut requests: MessageWriter<FireRequest>,
    gunners: Query<
        (Entity, &Transform, &Collider, &Weapon, &Team),
        (Without<Player>, Without<Dead>),
    >,
    targets: Query<(&Transform, &Collider, &Team), With<Target>>,
) {
    for (entity, transform, collider, weapon, team) in &gunners {
        if !weapon.cooldown.is_finished() {
            continue;
        }

        let origin = transform.translation.truncate();
        let mut nearest: Option<(Vec2, f32)> = None;
        for (target_transform, target_collider, target_team) in &targets {
            if *target_team != team.opposing() {
                continue;
            }
            let position = target_transform.translation.truncate();
            let distance = surface_distance(collider, origin, target_collider, position);
            if distance <= weapon.range && nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((position, distance));
            }
        }

        if let Some((position, _)) = nearest {
            requests.write(FireRequest {
                shooter: entity,
                target: position,
            });
        }
    }
}

/// Resolve fire requests: gate on the cooldown, compute the aim angle,
/// apply spread, and spawn projectiles.
///
/// Single-projectile weapons get a uniform random offset within
/// `±spread/2`; multi-projectile weapons fire a deterministic symmetric
/// fan. Requests for despawned or dead shooters are skipped.
fn fire_weapons(
    mut commands: Commands,
    mut requests: MessageReader<FireRequest>,
    mut shooters: Query<(&mut Weapon, &Transform, &Team), Without<Dead>>,
) {
    let mut rng = rand::rng();
    for request in requests.read() {
        let Ok((mut weapon, transform, team)) = shooters.get_mut(request.shooter) else {
            debug!("dropping fire request for missing shooter {:?}", request.shooter);
            continue;
        };
        if !weapon.cooldown.is_finished() {
            continue;
        }

        let origin = transform.translation.truncate();
        let aim = (request.target - origin).to_angle();

        if weapon.projectile_count <= 1 {
            let half = weapon.spread / 2.0;
            let angle = aim + rng.random_range(-half..=half);
            projectile::spawn_projectile(&mut commands, request.shooter, &weapon, origin, angle, *team);
        } else {
            for angle in fan_angles(aim, weapon.spread, weapon.projectile_count) {
                projectile::spawn_projectile(&mut commands, request.shooter, &weapon, origin, angle, *team);
            }
        }

        weapon.cooldown.reset();
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Weapon>();

    app.add_message::<FireRequest>();
    app.add_message::<PlayerFireIntent>();

    app.add_systems(
        Update,
        (
            tick_weapon_cooldowns,
            relay_player_fire_intents,
            auto_fire,
            fire_weapons,
        )
            .chain()
            .in_set(CombatSet::Fire)
            .run_if(gameplay_running),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stat_table_matches_archetypes() {
        let rifle = weapon_stats(WeaponKind::AssaultRifle);
        assert_eq!(rifle.damage, 35.0);
        assert_eq!(rifle.range, 800.0);
        assert_eq!(rifle.projectile_count, 1);

        let shotgun = weapon_stats(WeaponKind::Shotgun);
        assert_eq!(shotgun.damage, 15.0);
        assert_eq!(shotgun.projectile_count, 5);
        assert!((shotgun.spread - PI / 8.0).abs() < f32::EPSILON);

        let smg = weapon_stats(WeaponKind::Smg);
        assert!(smg.fire_interval_secs < rifle.fire_interval_secs);

        let pistol = weapon_stats(WeaponKind::Pistol);
        assert_eq!(pistol.damage, 40.0);
    }

    #[test]
    fn every_kind_has_usable_stats_and_a_name() {
        for &kind in WeaponKind::ALL {
            let stats = weapon_stats(kind);
            assert!(stats.damage > 0.0, "{kind:?}");
            assert!(stats.projectile_speed > 0.0, "{kind:?}");
            assert!(stats.range > 0.0, "{kind:?}");
            assert!(stats.fire_interval_secs > 0.0, "{kind:?}");
            assert!(stats.spread > 0.0, "{kind:?}");
            assert!(stats.projectile_count >= 1, "{kind:?}");
            assert!(!kind.display_name().is_empty());
        }
    }

    #[test]
    fn new_weapon_is_ready_to_fire() {
        let weapon = Weapon::new(WeaponKind::Pistol);
        assert!(weapon.cooldown.is_finished());
    }

    #[test]
    fn update_fire_rate_replaces_interval() {
        let mut weapon = Weapon::new(WeaponKind::Smg);
        weapon.update_fire_rate(1.0);
        assert_eq!(weapon.cooldown.duration(), Duration::from_secs(1));
    }

    #[test]
    fn shotgun_fan_is_symmetric_around_aim() {
        let stats = weapon_stats(WeaponKind::Shotgun);
        let aim = 1.2;
        let angles: Vec<f32> = fan_angles(aim, stats.spread, stats.projectile_count).collect();

        assert_eq!(angles.len(), 5);
        assert!((angles[0] - (aim - stats.spread / 2.0)).abs() < 1e-6);
        assert!((angles[4] - (aim + stats.spread / 2.0)).abs() < 1e-6);
        // Middle pellet flies straight at the aim angle.
        assert!((angles[2] - aim).abs() < 1e-6);
        // Pairwise symmetric around the aim.
        assert!(((angles[1] - aim) + (angles[3] - aim)).abs() < 1e-6);
    }

    #[test]
    fn fan_step_divides_spread_evenly() {
        let angles: Vec<f32> = fan_angles(0.0, PI / 8.0, 5).collect();
        let step = PI / 8.0 / 4.0;
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-6);
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::combat::projectile::Projectile;
    use crate::testing::assert_entity_count;
    use pretty_assertions::assert_eq;

    fn create_fire_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<FireRequest>();
        app.add_message::<PlayerFireIntent>();
        app.add_systems(
            Update,
            (
                tick_weapon_cooldowns,
                relay_player_fire_intents,
                auto_fire,
                fire_weapons,
            )
                .chain(),
        );
        app.update(); // Initialize time (first frame delta=0)
        app
    }

    fn spawn_gunner(world: &mut World, kind: WeaponKind, pos: Vec2) -> Entity {
        world
            .spawn((
                Weapon::new(kind),
                Team::Player,
                Collider::circle(12.0),
                Transform::from_translation(pos.extend(0.0)),
            ))
            .id()
    }

    fn spawn_target(world: &mut World, pos: Vec2) {
        world.spawn((
            Team::Enemy,
            Target,
            Collider::circle(10.0),
            Transform::from_translation(pos.extend(0.0)),
        ));
    }

    #[test]
    fn fire_request_spawns_one_projectile() {
        let mut app = create_fire_test_app();
        let gunner = spawn_gunner(app.world_mut(), WeaponKind::Pistol, Vec2::ZERO);

        app.world_mut().write_message(FireRequest {
            shooter: gunner,
            target: Vec2::new(100.0, 0.0),
        });
        app.update();

        assert_entity_count::<With<Projectile>>(&mut app, 1);
    }

    #[test]
    fn shotgun_fires_five_pellets() {
        let mut app = create_fire_test_app();
        let gunner = spawn_gunner(app.world_mut(), WeaponKind::Shotgun, Vec2::ZERO);

        app.world_mut().write_message(FireRequest {
            shooter: gunner,
            target: Vec2::new(100.0, 0.0),
        });
        app.update();

        assert_entity_count::<With<Projectile>>(&mut app, 5);
    }

    #[test]
    fn cooldown_blocks_back_to_back_shots() {
        let mut app = create_fire_test_app();
        let gunner = spawn_gunner(app.world_mut(), WeaponKind::Pistol, Vec2::ZERO);

        for _ in 0..2 {
            app.world_mut().write_message(FireRequest {
                shooter: gunner,
                target: Vec2::new(100.0, 0.0),
            });
            app.update();
        }

        // Second request lands inside the 0.7s interval and is dropped.
        assert_entity_count::<With<Projectile>>(&mut app, 1);
    }

    #[test]
    fn fire_request_for_missing_shooter_is_skipped() {
        let mut app = create_fire_test_app();
        let gunner = spawn_gunner(app.world_mut(), WeaponKind::Pistol, Vec2::ZERO);
        app.world_mut().despawn(gunner);

        app.world_mut().write_message(FireRequest {
            shooter: gunner,
            target: Vec2::new(100.0, 0.0),
        });
        app.update();

        assert_entity_count::<With<Projectile>>(&mut app, 0);
    }

    #[test]
    fn auto_fire_targets_nearest_enemy_in_range() {
        let mut app = create_fire_test_app();
        spawn_gunner(app.world_mut(), WeaponKind::Smg, Vec2::ZERO);
        spawn_target(app.world_mut(), Vec2::new(120.0, 0.0));
        spawn_target(app.world_mut(), Vec2::new(400.0, 0.0));

        app.update();

        let mut query = app.world_mut().query::<(&Projectile, &Transform)>();
        let results: Vec<_> = query.iter(app.world()).collect();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn auto_fire_ignores_targets_out_of_range() {
        let mut app = create_fire_test_app();
        spawn_gunner(app.world_mut(), WeaponKind::Shotgun, Vec2::ZERO); // range 300
        // Surface distance 350 - 12 - 10 = 328, past the shotgun's reach.
        spawn_target(app.world_mut(), Vec2::new(350.0, 0.0));

        app.update();

        assert_entity_count::<With<Projectile>>(&mut app, 0);
    }

    #[test]
    fn player_intent_fires_player_weapon() {
        let mut app = create_fire_test_app();
        let gunner = spawn_gunner(app.world_mut(), WeaponKind::AssaultRifle, Vec2::ZERO);
        app.world_mut().entity_mut(gunner).insert(Player);

        app.world_mut().write_message(PlayerFireIntent {
            target: Vec2::new(0.0, 200.0),
        });
        app.update();

        assert_entity_count::<With<Projectile>>(&mut app, 1);
    }
}
