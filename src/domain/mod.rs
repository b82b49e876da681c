//! Domain layer: connection identity, push messages and the live
//! broadcast hub.
//!
//! The hub is the only in-memory shared state of the gateway; everything
//! else lives in the SQLite store.

pub mod broadcast_hub;
pub mod connection_id;
pub mod interest_update;

pub use broadcast_hub::{
    ConnectionHub, ConnectionReceiver, ConnectionSender, CountSource, LiveConnection,
    connection_channel,
};
pub use connection_id::ConnectionId;
pub use interest_update::InterestUpdate;
