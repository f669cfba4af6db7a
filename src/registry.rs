//! Topology snapshot records.
//!
//! Serializable views of a live topology, for drivers that want to inspect
//! or export the state of devices and fabrics as JSON. Snapshots are plain
//! data captured at a point in time; they hold no references back into the
//! topology.

use serde::Serialize;

use crate::device::Computer;
use crate::ping::PingResponse;
use crate::switch::Switch;

/// One interface on a snapshotted device
#[derive(Serialize, Debug)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_len: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Whether the interface was connected to a fabric at capture time
    pub connected: bool,
}

/// One routing-table entry, with the backing interface resolved to its name
#[derive(Serialize, Debug)]
pub struct RouteRecord {
    pub metric: u32,
    pub interface: String,
}

/// A snapshotted end host
#[derive(Serialize, Debug)]
pub struct DeviceRecord {
    pub name: String,
    pub interfaces: Vec<InterfaceRecord>,
    pub routes: Vec<RouteRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ping: Option<PingResponse>,
}

/// A snapshotted fabric port
#[derive(Serialize, Debug)]
pub struct PortRecord {
    pub name: String,
    pub number: usize,
    pub vlan_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

/// A snapshotted fabric
#[derive(Serialize, Debug)]
pub struct FabricRecord {
    pub name: String,
    pub ports: Vec<PortRecord>,
}

/// Point-in-time view of a whole topology
#[derive(Serialize, Debug)]
pub struct TopologySnapshot {
    pub devices: Vec<DeviceRecord>,
    pub fabrics: Vec<FabricRecord>,
}

impl TopologySnapshot {
    /// Capture the current state of the given devices and fabrics
    pub fn capture(devices: &[&Computer], fabrics: &[&Switch]) -> Self {
        let devices = devices.iter().map(|device| capture_device(device)).collect();
        let fabrics = fabrics.iter().map(|fabric| capture_fabric(fabric)).collect();
        TopologySnapshot { devices, fabrics }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn capture_device(device: &Computer) -> DeviceRecord {
    let interfaces = device
        .interfaces()
        .map(|entry| {
            let iface = entry.iface();
            InterfaceRecord {
                name: iface.name().to_string(),
                address: iface.address().map(|a| a.to_string()),
                prefix_len: iface.prefix_len(),
                gateway: iface.gateway().map(|g| g.to_string()),
                connected: entry.connected_to().is_some(),
            }
        })
        .collect();

    let routes = device
        .routing_table()
        .entries()
        .iter()
        .filter_map(|route| {
            device
                .interfaces()
                .find(|entry| entry.id() == route.iface)
                .map(|entry| RouteRecord {
                    metric: route.metric,
                    interface: entry.iface().name().to_string(),
                })
        })
        .collect();

    DeviceRecord {
        name: device.name().to_string(),
        interfaces,
        routes,
        last_ping: device.last_ping_response().cloned(),
    }
}

fn capture_fabric(fabric: &Switch) -> FabricRecord {
    let ports = fabric
        .ports()
        .map(|port| PortRecord {
            name: port.name().to_string(),
            number: port.number(),
            vlan_id: port.vlan_id(),
            device: port.bound_device().map(str::to_string),
            interface: port.bound_interface().map(str::to_string),
        })
        .collect();

    FabricRecord {
        name: fabric.name().to_string(),
        ports,
    }
}
