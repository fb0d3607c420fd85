//! Leveling and attributes: a pure state machine over `LevelData`.
//!
//! No ECS types live here. The relay server and the in-game feedback loop
//! ([`feedback`]) both drive the same functions, so there is exactly one
//! implementation of the leveling rules.

pub mod feedback;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(super) fn plugin(app: &mut bevy::app::App) {
    feedback::plugin(app);
}

// === Constants ===

/// Cumulative-style threshold table, one entry per level. The entry at
/// index `N` is the experience needed to advance from level `N` to `N+1`;
/// leveling caps at the table's length.
pub const XP_PER_LEVEL: [u32; 10] = [0, 100, 250, 450, 700, 1000, 1400, 1900, 2500, 3200];

/// Highest reachable level.
pub const MAX_LEVEL: u32 = XP_PER_LEVEL.len() as u32;

/// Conversion from the `movement_speed` attribute to pixels per second.
pub const SPEED_PER_ATTRIBUTE_POINT: f32 = 20.0;

// === Types ===

/// Player classes, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerClass {
    Heavy,
    Light,
    #[default]
    Assault,
    Engineer,
}

impl PlayerClass {
    /// All classes, for iteration.
    pub const ALL: &[Self] = &[Self::Heavy, Self::Light, Self::Assault, Self::Engineer];
}

/// The four upgradable combat attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    DamagePerShot,
    FireRate,
    MovementSpeed,
    ShieldAmount,
}

impl Attribute {
    /// Wire-format name, matching the serialized representation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DamagePerShot => "damagePerShot",
            Self::FireRate => "fireRate",
            Self::MovementSpeed => "movementSpeed",
            Self::ShieldAmount => "shieldAmount",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current values of the four attributes. `fire_rate` is in shots per
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub damage_per_shot: f32,
    pub fire_rate: f32,
    pub movement_speed: f32,
    pub shield_amount: f32,
}

impl Attributes {
    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> f32 {
        match attribute {
            Attribute::DamagePerShot => self.damage_per_shot,
            Attribute::FireRate => self.fire_rate,
            Attribute::MovementSpeed => self.movement_speed,
            Attribute::ShieldAmount => self.shield_amount,
        }
    }

    pub const fn set(&mut self, attribute: Attribute, value: f32) {
        match attribute {
            Attribute::DamagePerShot => self.damage_per_shot = value,
            Attribute::FireRate => self.fire_rate = value,
            Attribute::MovementSpeed => self.movement_speed = value,
            Attribute::ShieldAmount => self.shield_amount = value,
        }
    }
}

/// Per-attribute upgrade scaling: value gained per point and the hard cap.
#[derive(Debug, Clone, Copy)]
pub struct AttributeScaling {
    pub per_point: f32,
    pub max: f32,
}

/// Scaling row for an attribute.
#[must_use]
pub const fn attribute_scaling(attribute: Attribute) -> AttributeScaling {
    match attribute {
        Attribute::DamagePerShot => AttributeScaling {
            per_point: 2.0,
            max: 100.0,
        },
        Attribute::FireRate => AttributeScaling {
            per_point: 0.2,
            max: 5.0,
        },
        Attribute::MovementSpeed => AttributeScaling {
            per_point: 0.5,
            max: 15.0,
        },
        Attribute::ShieldAmount => AttributeScaling {
            per_point: 10.0,
            max: 200.0,
        },
    }
}

/// Default attribute baseline for a class.
#[must_use]
pub const fn default_attributes(class: PlayerClass) -> Attributes {
    match class {
        PlayerClass::Heavy => Attributes {
            damage_per_shot: 15.0,
            fire_rate: 0.8,
            movement_speed: 4.0,
            shield_amount: 100.0,
        },
        PlayerClass::Light => Attributes {
            damage_per_shot: 8.0,
            fire_rate: 1.5,
            movement_speed: 7.0,
            shield_amount: 50.0,
        },
        PlayerClass::Assault => Attributes {
            damage_per_shot: 20.0,
            fire_rate: 0.7,
            movement_speed: 5.0,
            shield_amount: 75.0,
        },
        PlayerClass::Engineer => Attributes {
            damage_per_shot: 10.0,
            fire_rate: 1.2,
            movement_speed: 6.0,
            shield_amount: 60.0,
        },
    }
}

/// A player's full leveling state.
///
/// `experience_points` is relative to the current level: crossing a
/// threshold subtracts it, so a fresh level always starts near zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub current_level: u32,
    pub experience_points: u32,
    pub attributes: Attributes,
    pub available_attribute_points: u32,
}

/// A successful attribute upgrade, for echoing back to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeUpgrade {
    pub attribute: Attribute,
    pub new_value: f32,
    pub remaining_points: u32,
}

/// Why an attribute upgrade was rejected. Rejection never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("not enough attribute points available")]
    InsufficientPoints,
    #[error("cannot exceed maximum value for {0}")]
    AttributeCapExceeded(Attribute),
}

// === Operations ===

/// Fresh level data for a class: level 1, no experience, no points.
#[must_use]
pub const fn initialize_level_data(class: PlayerClass) -> LevelData {
    LevelData {
        current_level: 1,
        experience_points: 0,
        attributes: default_attributes(class),
        available_attribute_points: 0,
    }
}

/// Experience needed to advance past the given level, or `None` at the cap.
#[must_use]
pub fn next_level_threshold(level: u32) -> Option<u32> {
    XP_PER_LEVEL.get(level as usize).copied()
}

/// Grant experience, crossing as many thresholds as the amount covers.
/// Each level-up subtracts its threshold and grants one attribute point.
/// Returns the number of levels gained.
pub fn add_experience(data: &mut LevelData, amount: u32) -> u32 {
    data.experience_points += amount;

    let mut gained = 0;
    while let Some(threshold) = next_level_threshold(data.current_level) {
        if data.experience_points < threshold {
            break;
        }
        data.experience_points -= threshold;
        data.current_level += 1;
        data.available_attribute_points += 1;
        gained += 1;
    }
    gained
}

/// Spend `amount` points on one attribute. Fails without partial mutation
/// when points are short or the cap would be exceeded.
pub fn upgrade_attribute(
    data: &mut LevelData,
    attribute: Attribute,
    amount: u32,
) -> Result<AttributeUpgrade, UpgradeError> {
    if data.available_attribute_points < amount {
        return Err(UpgradeError::InsufficientPoints);
    }

    let scaling = attribute_scaling(attribute);
    let new_value = scaling.per_point.mul_add(amount as f32, data.attributes.get(attribute));
    if new_value > scaling.max {
        return Err(UpgradeError::AttributeCapExceeded(attribute));
    }

    data.attributes.set(attribute, new_value);
    data.available_attribute_points -= amount;
    Ok(AttributeUpgrade {
        attribute,
        new_value,
        remaining_points: data.available_attribute_points,
    })
}

/// Fraction of the way to the next level, in `[0, 1)`. Zero at the cap.
#[must_use]
pub fn experience_progress(data: &LevelData) -> f32 {
    next_level_threshold(data.current_level)
        .map_or(0.0, |threshold| data.experience_points as f32 / threshold as f32)
}
