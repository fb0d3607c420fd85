//! Common imports for the entire crate.

pub use bevy::prelude::*;

pub use crate::gameplay::{Dead, Health, Movement, Target, Team};
pub use crate::{GameSet, GameState, gameplay_running};
