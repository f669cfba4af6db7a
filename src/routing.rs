//! Routing table maintenance.
//!
//! A device's routing table is derived state: exactly one entry per live
//! interface, appended when the interface is added and dropped when, and
//! only when, the backing interface is removed. The owning device performs
//! both halves of each update, so observers never see an interface without
//! its route or a route without its interface.

use crate::iface::InterfaceId;

/// A single reachability metric entry backed by a live interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// Positional metric: the interface count at the time of insertion
    pub metric: u32,
    /// Identity of the backing interface
    pub iface: InterfaceId,
}

/// Ordered list of routes, one per live interface on the owning device.
///
/// Metrics are assigned at insertion and never renumbered; removing an
/// interface can therefore leave gaps, and a later insertion can repeat a
/// metric. Ties keep insertion order.
#[derive(Debug, Default)]
pub struct RoutingTable {
    entries: Vec<RouteEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        RoutingTable {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// The route backed by `iface`, if it is still live
    pub fn route_for(&self, iface: InterfaceId) -> Option<&RouteEntry> {
        self.entries.iter().find(|r| r.iface == iface)
    }

    /// Append a route for a newly added interface
    pub(crate) fn add_route(&mut self, metric: u32, iface: InterfaceId) {
        self.entries.push(RouteEntry { metric, iface });
    }

    /// Drop the route backed by `iface`. Metrics of surviving routes are
    /// untouched.
    pub(crate) fn remove_routes_for(&mut self, iface: InterfaceId) {
        self.entries.retain(|r| r.iface != iface);
    }
}
