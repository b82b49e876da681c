//! WebSocket layer: live interest count push.
//!
//! The endpoint at `/ws/interest` sends `{"count": n}` on connect and after
//! every committed interest event. Client frames are read only to detect
//! disconnects.

pub mod connection;
pub mod handler;
