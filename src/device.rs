//! End-host devices and the fabric attachment seam.
//!
//! A `Computer` exclusively owns its interface table and routing table and
//! couples every interface mutation with the matching routing update. The
//! `Endpoint` trait is the only surface through which a fabric may touch
//! device state.

use std::fmt;
use std::net::Ipv4Addr;

use log::{debug, info};

use crate::iface::{Interface, InterfaceEntry, InterfaceError, InterfaceSet, PeerRef};
use crate::ping::{self, PingResponse, DEFAULT_PING_COUNT};
use crate::routing::RoutingTable;

/// Kind classification for devices that can attach to a fabric port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// End host with addressable interfaces
    Computer,
    /// A device the fabric does not know how to service
    Unmanaged,
}

/// Attachment seam between a fabric port and a device.
///
/// A fabric never reaches into device state directly; it records or clears
/// connection state through these operations, and a device stays the sole
/// owner of its interface and routing tables.
pub trait Endpoint {
    fn kind(&self) -> DeviceKind;

    fn endpoint_name(&self) -> &str;

    /// Record that `name` now connects to `peer`. Unknown names are tolerated.
    fn connect_interface(&mut self, name: &str, peer: PeerRef);

    /// Clear the connection state of `name`. Idempotent.
    fn disconnect_interface(&mut self, name: &str);
}

/// An end host: a named device owning interfaces and the routes derived
/// from them.
pub struct Computer {
    name: String,
    eths: InterfaceSet,
    routes: RoutingTable,
    last_ping: Option<PingResponse>,
}

impl Computer {
    pub fn new(name: impl Into<String>) -> Self {
        Computer {
            name: name.into(),
            eths: InterfaceSet::new(),
            routes: RoutingTable::new(),
            last_ping: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a named interface and its routing entry as one unit.
    ///
    /// With no template the interface starts unconfigured; with one, the
    /// template's validated fields are copied so later template mutation
    /// cannot reach the device. The new route's metric is the interface
    /// count after insertion (1-indexed).
    pub fn add_interface(
        &mut self,
        name: &str,
        template: Option<&Interface>,
    ) -> Result<(), InterfaceError> {
        let id = self.eths.insert(name, template)?;
        let metric = self.eths.len() as u32;
        self.routes.add_route(metric, id);
        info!("{}: added interface {} at metric {}", self.name, name, metric);
        Ok(())
    }

    /// Remove a named interface and its routing entry. Removing an unknown
    /// interface is tolerated.
    pub fn remove_interface(&mut self, name: &str) {
        if let Some(entry) = self.eths.remove(name) {
            self.routes.remove_routes_for(entry.id());
            info!("{}: removed interface {}", self.name, name);
        }
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceEntry> {
        self.eths.get(name)
    }

    /// Mutable access to an interface's addressing, for configuring it
    /// after it has been added
    pub fn interface_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.eths.get_mut(name).map(|entry| entry.iface_mut())
    }

    /// Interfaces in table order
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceEntry> {
        self.eths.iter()
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routes
    }

    /// The device's current set of known-reachable peers.
    ///
    /// Derived eagerly from the routing table: a route contributes its
    /// interface's gateway when the interface is addressed, connected to a
    /// fabric, and the gateway lies inside the interface's own subnet -
    /// the only next hops resolvable without cross-device traffic. Empty
    /// means no route is known.
    pub fn reachability_cache(&self) -> Vec<Ipv4Addr> {
        let mut reachable = Vec::new();
        for route in self.routes.entries() {
            let entry = match self.eths.iter().find(|e| e.id() == route.iface) {
                Some(entry) => entry,
                None => continue,
            };
            if entry.connected_to().is_none() {
                continue;
            }
            if let Some(gateway) = entry.iface().gateway() {
                if entry.iface().subnet_contains(gateway) && !reachable.contains(&gateway) {
                    reachable.push(gateway);
                }
            }
        }
        debug!("{}: reachability cache {:?}", self.name, reachable);
        reachable
    }

    /// Connectivity check with the default report count
    pub fn ping(&mut self, destination: &str) -> PingResponse {
        self.ping_with_count(destination, DEFAULT_PING_COUNT)
    }

    /// Connectivity check, reporting the outcome `count` times.
    ///
    /// The verdict is computed once; `count` repeats the report only. The
    /// response is recorded as the device's last observable result.
    pub fn ping_with_count(&mut self, destination: &str, count: u32) -> PingResponse {
        let cache = self.reachability_cache();
        let response = ping::resolve(&cache, destination);
        ping::report(&self.name, &response, count);
        self.last_ping = Some(response.clone());
        response
    }

    /// The most recent ping outcome, if any call has completed
    pub fn last_ping_response(&self) -> Option<&PingResponse> {
        self.last_ping.as_ref()
    }
}

impl Endpoint for Computer {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Computer
    }

    fn endpoint_name(&self) -> &str {
        &self.name
    }

    fn connect_interface(&mut self, name: &str, peer: PeerRef) {
        self.eths.connect(name, peer);
    }

    fn disconnect_interface(&mut self, name: &str) {
        self.eths.disconnect(name);
    }
}

impl fmt::Display for Computer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eths.is_empty() {
            return write!(f, "<Computer: {}>", self.name);
        }
        let eths: Vec<String> = self
            .eths
            .iter()
            .map(|entry| {
                let iface = entry.iface();
                match (iface.address(), iface.prefix_len()) {
                    (Some(addr), Some(len)) => format!("{}: {}/{}", iface.name(), addr, len),
                    (Some(addr), None) => format!("{}: {}", iface.name(), addr),
                    _ => format!("{}: unconfigured", iface.name()),
                }
            })
            .collect();
        write!(f, "<Computer: {} eths: {}>", self.name, eths.join(" - "))
    }
}
