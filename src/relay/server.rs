//! The authoritative lobby/leveling state machine behind the relay.

use std::collections::HashMap;

use bevy::log::{debug, warn};
use serde::Serialize;

use super::messages::{ClientMessage, ConnectionId, Outbound, PlayerData, ServerMessage};
use crate::gameplay::progression::{add_experience, initialize_level_data, upgrade_attribute};

/// Liveness payload for the health side-channel, unrelated to game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Per-connection player state, mutated only by [`RelayServer::handle`]
/// and [`RelayServer::disconnect`].
#[derive(Debug, Default)]
pub struct RelayServer {
    players: HashMap<ConnectionId, PlayerData>,
}

impl RelayServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Liveness check payload.
    #[must_use]
    pub const fn health_status() -> HealthStatus {
        HealthStatus { status: "ok" }
    }

    /// Everyone currently in the lobby.
    #[must_use]
    pub fn player_list(&self) -> Vec<PlayerData> {
        self.players.values().cloned().collect()
    }

    pub fn connect(&mut self, connection: &ConnectionId) {
        debug!("player connected: {connection:?}");
    }

    /// Drop a connection's player and tell everyone who is left.
    pub fn disconnect(&mut self, connection: &ConnectionId) -> Vec<Outbound> {
        debug!("player disconnected: {connection:?}");
        self.players.remove(connection);
        vec![Outbound::Broadcast(ServerMessage::PlayerList(
            self.player_list(),
        ))]
    }

    /// Apply one inbound message and produce the replies it warrants.
    pub fn handle(&mut self, connection: &ConnectionId, message: ClientMessage) -> Vec<Outbound> {
        match message {
            ClientMessage::Join(mut player) => {
                // The server owns leveling state; whatever the client sent
                // is replaced with a fresh initialization for its class.
                player.level_data = initialize_level_data(player.class);
                self.players.insert(connection.clone(), player);
                vec![self.broadcast_list()]
            }
            ClientMessage::Ready(is_ready) => {
                let Some(player) = self.players.get_mut(connection) else {
                    warn!("ready from unknown connection {connection:?}");
                    return Vec::new();
                };
                player.is_ready = is_ready;
                vec![self.broadcast_list()]
            }
            ClientMessage::SelectClass(class) => {
                let Some(player) = self.players.get_mut(connection) else {
                    warn!("class select from unknown connection {connection:?}");
                    return Vec::new();
                };
                player.class = class;
                vec![self.broadcast_list()]
            }
            ClientMessage::GainExperience(amount) => {
                let Some(player) = self.players.get_mut(connection) else {
                    warn!("experience from unknown connection {connection:?}");
                    return Vec::new();
                };
                let gained = add_experience(&mut player.level_data, amount);
                let level = player.level_data.current_level;
                let points = player.level_data.available_attribute_points;
                (0..gained)
                    .map(|step| {
                        Outbound::Direct(ServerMessage::LevelUp {
                            new_level: level - gained + step + 1,
                            available_points: points,
                        })
                    })
                    .collect()
            }
            ClientMessage::UpgradeAttribute { attribute, amount } => {
                let Some(player) = self.players.get_mut(connection) else {
                    warn!("upgrade from unknown connection {connection:?}");
                    return Vec::new();
                };
                match upgrade_attribute(&mut player.level_data, attribute, amount) {
                    Ok(upgrade) => {
                        vec![Outbound::Direct(ServerMessage::AttributeUpgraded(upgrade))]
                    }
                    Err(error) => vec![Outbound::Direct(ServerMessage::UpgradeError {
                        message: error.to_string(),
                    })],
                }
            }
        }
    }

    fn broadcast_list(&self) -> Outbound {
        Outbound::Broadcast(ServerMessage::PlayerList(self.player_list()))
    }
}
