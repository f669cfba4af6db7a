//! Interface model: addressing, validation, and per-device interface tables.
//!
//! This module owns the interface lifecycle up to (but not including) the
//! routing consequences of adding or removing one, which are the owning
//! device's responsibility.

pub mod addr;
pub mod set;

// Re-export commonly used types
pub use addr::{Interface, InterfaceError};
pub use set::{InterfaceEntry, InterfaceId, InterfaceSet, PeerRef};
