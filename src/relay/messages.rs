//! Wire types for the lobby relay, shaped to match the original
//! Socket.IO payloads (camelCase fields, `event`/`data` envelope).

use serde::{Deserialize, Serialize};

use crate::gameplay::progression::{Attribute, AttributeUpgrade, LevelData, PlayerClass};

/// Opaque per-connection identity assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A lobby member as shared with every client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub id: String,
    pub name: String,
    pub class: PlayerClass,
    pub is_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_host: Option<bool>,
    pub level_data: LevelData,
}

fn default_upgrade_amount() -> u32 {
    1
}

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    #[serde(rename = "player:join")]
    Join(PlayerData),
    #[serde(rename = "player:ready")]
    Ready(bool),
    #[serde(rename = "player:class")]
    SelectClass(PlayerClass),
    #[serde(rename = "player:gainExperience")]
    GainExperience(u32),
    #[serde(rename = "player:upgradeAttribute")]
    UpgradeAttribute {
        attribute: Attribute,
        #[serde(default = "default_upgrade_amount")]
        amount: u32,
    },
}

/// Messages the relay sends back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    #[serde(rename = "player:list")]
    PlayerList(Vec<PlayerData>),
    #[serde(rename = "player:levelUp")]
    LevelUp {
        new_level: u32,
        available_points: u32,
    },
    #[serde(rename = "player:attributeUpgraded")]
    AttributeUpgraded(AttributeUpgrade),
    #[serde(rename = "player:upgradeError")]
    UpgradeError { message: String },
}

/// Routing for an outbound message: everyone, or only the client whose
/// inbound message produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Broadcast(ServerMessage),
    Direct(ServerMessage),
}
