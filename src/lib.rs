//! Squad survival: wave-survival combat simulation with a squad-lobby
//! leveling relay.
//!
//! This crate owns the simulation core — units, shields, weapons,
//! projectiles, enemy waves, the dogtag respawn lifecycle, and the
//! experience/attribute progression loop — plus the transport-agnostic
//! relay state machine in [`relay`]. Rendering, input polling, and the
//! actual socket transport are host concerns: they drive the core through
//! messages and read back component state.

pub mod gameplay;
pub mod prelude;
pub mod relay;
pub mod third_party;

#[cfg(test)]
pub mod testing;

use bevy::prelude::*;

// === Arena ===

/// Playable arena width (pixels), centered on the origin.
pub const ARENA_WIDTH: f32 = 800.0;

/// Playable arena height (pixels), centered on the origin.
pub const ARENA_HEIGHT: f32 = 600.0;

/// Whether a point lies inside the arena. Projectiles leaving the arena
/// are silently deactivated.
#[must_use]
pub fn arena_contains(point: Vec2) -> bool {
    point.x.abs() <= ARENA_WIDTH / 2.0 && point.y.abs() <= ARENA_HEIGHT / 2.0
}

// === States ===

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Squad lobby: class selection and ready-up, driven by the relay.
    #[default]
    Lobby,
    /// Active wave-survival gameplay.
    InGame,
    /// Player and squad are gone with no respawns pending.
    GameOver,
}

// === System sets ===

/// Per-tick simulation phases, chained in this order inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Target selection for enemies and friendly auto-fire.
    Ai,
    /// Velocity updates: enemy pursuit, player move intent.
    Movement,
    /// Weapon fire, projectile flight, hit/contact/pickup resolution.
    Combat,
    /// Death handling, dogtag drops, game-over detection.
    Death,
    /// Wave spawning and dogtag respawn timers.
    Spawn,
    /// Experience intake and attribute-upgrade feedback.
    Progression,
}

/// Run condition for all simulation systems: only while actively in game.
pub fn gameplay_running(state: Res<State<GameState>>) -> bool {
    matches!(state.get(), GameState::InGame)
}

// === Root plugin ===

/// Wires states, system-set ordering, and every gameplay plugin.
///
/// Physics ([`third_party::plugin`]) is added separately by the host so
/// headless tests can drive collision state by hand.
pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();

    app.configure_sets(
        Update,
        (
            GameSet::Ai,
            GameSet::Movement,
            GameSet::Combat,
            GameSet::Death,
            GameSet::Spawn,
            GameSet::Progression,
        )
            .chain(),
    );

    app.add_plugins(gameplay::plugin);
}
