//! Request-side identifiers and scope lists handed to the handshake controller.

pub mod id;
pub mod scope;

pub use id::*;
pub use scope::*;
