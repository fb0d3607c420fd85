//! Combat systems: weapons, projectiles, the damage pipeline, and death.

pub mod death;
pub mod projectile;
pub mod weapon;

use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::Health;
use crate::gameplay::units::shield::Shield;

pub use death::DeathCheck;

// === System sets ===

/// Resolution order inside [`GameSet::Combat`]: weapons fire, projectiles
/// fly and land, enemies apply contact damage, the player picks up dogtags.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Fire,
    Projectiles,
    Contact,
    Pickup,
}

// === Damage pipeline ===

/// Apply damage through the shield-then-health pipeline.
///
/// The shield absorbs first (with its reduction multiplier); only the
/// spillover reaches health, clamped at zero. Units without a shield take
/// the full amount on health. Returns the amount health actually lost.
pub fn apply_unit_damage(shield: Option<&mut Shield>, health: &mut Health, amount: f32) -> f32 {
    let residual = match shield {
        Some(shield) => shield.take_damage(amount),
        None => amount,
    };
    let applied = residual.min(health.current);
    health.current -= applied;
    applied
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSet::Fire,
            CombatSet::Projectiles,
            CombatSet::Contact,
            CombatSet::Pickup,
        )
            .chain()
            .in_set(GameSet::Combat),
    );

    app.add_plugins((weapon::plugin, projectile::plugin, death::plugin));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::units::shield::ShieldConfig;
    use pretty_assertions::assert_eq;

    const CONFIG: ShieldConfig = ShieldConfig {
        max: 50.0,
        regen_rate: 5.0,
        regen_delay_secs: 2.0,
        damage_reduction: 1.0,
    };

    #[test]
    fn shield_absorbs_before_health() {
        let mut shield = Shield::new(CONFIG);
        let mut health = Health::new(100.0);

        apply_unit_damage(Some(&mut shield), &mut health, 30.0);
        assert_eq!(shield.current, 20.0);
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn spillover_reaches_health() {
        let mut shield = Shield::new(CONFIG);
        let mut health = Health::new(100.0);

        apply_unit_damage(Some(&mut shield), &mut health, 80.0);
        assert_eq!(shield.current, 0.0);
        assert_eq!(health.current, 70.0);
    }

    #[test]
    fn no_shield_hits_health_directly() {
        let mut health = Health::new(100.0);
        apply_unit_damage(None, &mut health, 25.0);
        assert_eq!(health.current, 75.0);
    }

    #[test]
    fn health_clamps_at_zero() {
        let mut health = Health::new(10.0);
        apply_unit_damage(None, &mut health, 9999.0);
        assert_eq!(health.current, 0.0);
    }
}
