//! Transport-agnostic squad lobby relay.
//!
//! The relay owns the authoritative per-connection player state and
//! re-exposes the leveling core ([`crate::gameplay::progression`]) over a
//! small message protocol. The actual socket transport is a host concern:
//! it feeds [`ClientMessage`]s in and fans [`Outbound`]s back out.

mod messages;
mod server;

pub use messages::{ClientMessage, ConnectionId, Outbound, PlayerData, ServerMessage};
pub use server::{HealthStatus, RelayServer};
