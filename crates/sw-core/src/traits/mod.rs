//! Core trait definitions

mod transport;

pub use transport::{RemoteSession, Transport};
