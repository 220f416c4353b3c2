//! Network layer.
//!
//! The proxy talks to the responder over a local Unix domain socket by
//! default; TCP is available for setups where the proxy runs elsewhere.

pub mod listener;

pub use listener::{Listener, ListenerError, SocketGuard};
