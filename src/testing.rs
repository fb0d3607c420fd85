//! Shared helpers for headless unit tests.

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;

use crate::GameState;
use crate::gameplay::{Health, Movement, Target, Team};

/// Minimal headless app with states initialized but no gameplay systems.
/// Use this when testing a single system in isolation.
pub fn create_base_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

/// Full headless app running the entire simulation core (no physics).
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, TransformPlugin));
    app.add_plugins(crate::plugin);
    app
}

/// Move the app into `InGame` and flush the transition.
pub fn transition_to_ingame(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
}

/// Assert how many entities match the query filter `F`.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count();
    assert_eq!(count, expected, "unexpected entity count");
}

/// Wind a timer to one nanosecond before expiry so the next update,
/// however small its real delta, fires it.
pub fn nearly_expire_timer(timer: &mut Timer) {
    let duration = timer.duration();
    timer.set_elapsed(duration - Duration::from_nanos(1));
}

/// Spawn a bare combat-capable unit: no shield, no weapon, no physics.
pub fn spawn_test_unit(world: &mut World, team: Team, pos: Vec2) -> Entity {
    world
        .spawn((
            team,
            Health::new(100.0),
            Movement { speed: 100.0 },
            Target,
            Transform::from_translation(pos.extend(0.0)),
        ))
        .id()
}
