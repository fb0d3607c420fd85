//! Wave spawning: size and composition scale with the wave number, and a
//! new wave starts as soon as the arena is clear.

use bevy::prelude::*;
use rand::Rng;

use super::{Enemy, EnemyKind, spawn_enemy};
use crate::{ARENA_HEIGHT, ARENA_WIDTH, GameSet, GameState, gameplay_running};

// === Constants ===

/// Hard cap on enemies per wave.
const MAX_WAVE_SIZE: u32 = 20;

/// Margin from the arena edge for spawn positions.
const SPAWN_MARGIN: f32 = 20.0;

// === Resources ===

/// The current wave number. 0 until the first wave spawns.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct WaveState {
    pub wave: u32,
}

// === Wave math ===

/// Enemies in the given wave: `5 + wave * 2`, capped at [`MAX_WAVE_SIZE`].
#[must_use]
pub const fn wave_size(wave: u32) -> u32 {
    let size = 5 + wave * 2;
    if size > MAX_WAVE_SIZE { MAX_WAVE_SIZE } else { size }
}

/// Spawn weights `[fast, normal, heavy]` for a wave. The heavy share grows
/// with the wave number at the expense of the other two, capping at half
/// the wave.
#[must_use]
pub fn kind_weights(wave: u32) -> [f32; 3] {
    let wave = wave as f32;
    let heavy = (0.05 * wave).min(0.5);
    let fast = 0.025f32.mul_add(-wave, 0.45).max(0.2);
    let normal = 1.0 - heavy - fast;
    [fast, normal, heavy]
}

/// Draw an enemy kind from the wave's weight table.
pub fn sample_kind<R: Rng>(rng: &mut R, wave: u32) -> EnemyKind {
    let weights = kind_weights(wave);
    let roll: f32 = rng.random_range(0.0..1.0);

    let mut cumulative = 0.0;
    for (kind, weight) in EnemyKind::ALL.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return *kind;
        }
    }
    EnemyKind::Heavy
}

/// A random point just inside one of the four arena edges.
fn random_edge_position<R: Rng>(rng: &mut R) -> Vec2 {
    let half_w = ARENA_WIDTH / 2.0 - SPAWN_MARGIN;
    let half_h = ARENA_HEIGHT / 2.0 - SPAWN_MARGIN;
    match rng.random_range(0..4u8) {
        0 => Vec2::new(rng.random_range(-half_w..half_w), half_h),
        1 => Vec2::new(rng.random_range(-half_w..half_w), -half_h),
        2 => Vec2::new(-half_w, rng.random_range(-half_h..half_h)),
        _ => Vec2::new(half_w, rng.random_range(-half_h..half_h)),
    }
}

// === Systems ===

/// Start the next wave whenever no enemies remain.
fn spawn_waves(
    mut commands: Commands,
    mut wave_state: ResMut<WaveState>,
    enemies: Query<(), With<Enemy>>,
) {
    if !enemies.is_empty() {
        return;
    }

    wave_state.wave += 1;
    let wave = wave_state.wave;
    debug!("spawning wave {wave} ({} enemies)", wave_size(wave));

    let mut rng = rand::rng();
    for _ in 0..wave_size(wave) {
        let kind = sample_kind(&mut rng, wave);
        let position = random_edge_position(&mut rng);
        spawn_enemy(&mut commands, kind, wave, position);
    }
}

/// A fresh match starts back at wave zero.
fn reset_waves(mut wave_state: ResMut<WaveState>) {
    wave_state.wave = 0;
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<WaveState>();
    app.init_resource::<WaveState>();

    app.add_systems(OnEnter(GameState::InGame), reset_waves);
    app.add_systems(
        Update,
        spawn_waves.in_set(GameSet::Spawn).run_if(gameplay_running),
    );
}
