//! Headless host loop: runs the simulation core without a renderer.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;

use squad_survival::GameState;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins((StatesPlugin, TransformPlugin))
        .add_plugins((squad_survival::plugin, squad_survival::third_party::plugin))
        .add_systems(Startup, begin_match)
        .run();
}

/// Skip the lobby when running headless — go straight into the game.
fn begin_match(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}
