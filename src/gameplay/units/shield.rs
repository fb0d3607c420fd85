//! Shields: regenerating damage buffers that absorb hits before health.

use bevy::prelude::*;

use crate::gameplay::{Dead, Team};
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Extra regen granted by a support engineer's aura (per second).
pub const AURA_BOOST_RATE: f32 = 2.0;

/// Radius of the support engineer's boost aura.
pub const AURA_RANGE: f32 = 150.0;

/// How often the aura re-applies its boost.
pub const AURA_INTERVAL_SECS: f32 = 1.0;

// === Configuration ===

/// Shield parameters for a unit archetype. All values are compile-time
/// constants in the unit capability table.
#[derive(Debug, Clone, Copy)]
pub struct ShieldConfig {
    pub max: f32,
    /// Recharge rate in points per second.
    pub regen_rate: f32,
    /// Seconds after the last hit before recharge resumes.
    pub regen_delay_secs: f32,
    /// Fraction of incoming damage the shield actually receives, in (0, 1].
    pub damage_reduction: f32,
}

// === Components ===

/// A regenerating buffer that absorbs damage before health.
///
/// Any hit, even against an empty shield, restarts the regen delay.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Shield {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32,
    pub regen_boost: f32,
    pub regen_delay_secs: f32,
    pub damage_reduction: f32,
    since_damage_secs: f32,
}

impl Shield {
    /// A full shield built from an archetype config.
    #[must_use]
    pub const fn new(config: ShieldConfig) -> Self {
        Self {
            current: config.max,
            max: config.max,
            regen_rate: config.regen_rate,
            regen_boost: 0.0,
            regen_delay_secs: config.regen_delay_secs,
            damage_reduction: config.damage_reduction,
            since_damage_secs: 0.0,
        }
    }

    /// Absorb a hit and return the spillover to apply to health.
    ///
    /// The reduction multiplier applies before absorption, so the
    /// conservation invariant is `absorbed + residual == amount * reduction`.
    /// The regen delay restarts even when the shield is already empty.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let reduced = amount * self.damage_reduction;
        self.since_damage_secs = 0.0;

        let absorbed = reduced.min(self.current);
        self.current -= absorbed;
        reduced - absorbed
    }

    /// Advance the regen clock and recharge once the delay has passed.
    pub fn tick(&mut self, dt: f32) {
        self.since_damage_secs += dt;
        if self.since_damage_secs > self.regen_delay_secs && self.current < self.max {
            let rate = self.regen_rate + self.regen_boost;
            self.current = (self.current + rate * dt).min(self.max);
        }
    }

    /// Set the temporary regen modifier. Replaces any previous boost;
    /// there is no decay, the next aura pulse (or a zero set) overwrites it.
    pub fn boost(&mut self, amount: f32) {
        self.regen_boost = amount;
    }

    /// Restore full charge and let regen resume immediately. Used on respawn.
    pub fn reset(&mut self) {
        self.current = self.max;
        self.since_damage_secs = self.regen_delay_secs;
    }

    /// Rescale capacity, keeping the current charge fraction (floored) so an
    /// upgrade never snaps the shield to full or empty.
    pub fn update_max(&mut self, new_max: f32) {
        let ratio = if self.max > 0.0 {
            self.current / self.max
        } else {
            1.0
        };
        self.max = new_max;
        self.current = (ratio * new_max).floor().clamp(0.0, new_max);
    }
}

/// Support engineer aura: periodically sets the regen boost on nearby
/// friendly shields.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ShieldBoostAura {
    pub range: f32,
    pub boost: f32,
    pub timer: Timer,
}

impl Default for ShieldBoostAura {
    fn default() -> Self {
        Self {
            range: AURA_RANGE,
            boost: AURA_BOOST_RATE,
            timer: Timer::from_seconds(AURA_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

// === Systems ===

/// Recharge all live shields. Dead units keep their shield state frozen
/// until a respawn resets it.
fn regenerate_shields(time: Res<Time>, mut shields: Query<&mut Shield, Without<Dead>>) {
    for mut shield in &mut shields {
        shield.tick(time.delta_secs());
    }
}

/// Pulse every engineer aura and set the boost on friendly shields in range.
/// Units that drift out of range keep their last boost until the next pulse
/// of some aura overwrites it.
fn boost_nearby_shields(
    time: Res<Time>,
    mut auras: Query<(Entity, &Transform, &mut ShieldBoostAura), Without<Dead>>,
    mut shields: Query<(Entity, &Transform, &Team, &mut Shield), Without<Dead>>,
) {
    for (aura_entity, aura_transform, mut aura) in &mut auras {
        aura.timer.tick(time.delta());
        if !aura.timer.just_finished() {
            continue;
        }

        let center = aura_transform.translation.truncate();
        for (entity, transform, team, mut shield) in &mut shields {
            if entity == aura_entity || *team != Team::Player {
                continue;
            }
            if transform.translation.truncate().distance(center) <= aura.range {
                shield.boost(aura.boost);
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Shield>().register_type::<ShieldBoostAura>();

    app.add_systems(
        Update,
        (regenerate_shields, boost_nearby_shields)
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );
}
