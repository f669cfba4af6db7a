//! Switch fabric: fixed-capacity numbered ports binding device interfaces.
//!
//! A port binds at most one device interface at a time. The fabric keeps
//! only weak handles to attached devices and mutates device state solely
//! through the `Endpoint` seam, so a fabric can neither keep a device
//! alive nor outlive its state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::device::{DeviceKind, Endpoint};
use crate::iface::PeerRef;

/// Fabric construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Name of the fabric, reported to devices as the connection peer
    pub name: String,
    /// Number of ports, numbered 1 to `max_ports`
    pub max_ports: usize,
    /// Prefix for synthetic port names ("<prefix>_<n>")
    pub port_name_prefix: String,
    /// VLAN id assigned to fresh and reset ports
    pub default_vlan: u16,
}

impl Default for FabricConfig {
    fn default() -> Self {
        FabricConfig {
            name: "switch0".to_string(),
            max_ports: 24,
            port_name_prefix: "GigaEthernet".to_string(),
            default_vlan: 1,
        }
    }
}

/// Fabric errors
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("port {port} must be from 1 to {max}")]
    PortOutOfRange { port: usize, max: usize },

    #[error("unsupported device kind: {kind:?}")]
    UnsupportedDeviceType { kind: DeviceKind },

    #[error("{port_name} has already connected to another device")]
    PortAlreadyConnected { port_name: String },
}

/// A bound port holds the whole binding: weak device handle, device name,
/// and the interface name on that device. Never one without the others.
struct PortBinding {
    device: Weak<RefCell<dyn Endpoint>>,
    device_name: String,
    iface: String,
}

/// A numbered slot on the fabric
pub struct SwitchPort {
    port_name: String,
    port_number: usize,
    vlan_id: u16,
    binding: Option<PortBinding>,
}

impl SwitchPort {
    fn new(port_number: usize, config: &FabricConfig) -> Self {
        SwitchPort {
            port_name: format!("{}_{}", config.port_name_prefix, port_number),
            port_number,
            vlan_id: config.default_vlan,
            binding: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.port_name
    }

    pub fn number(&self) -> usize {
        self.port_number
    }

    pub fn vlan_id(&self) -> u16 {
        self.vlan_id
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Name of the bound device, if any
    pub fn bound_device(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.device_name.as_str())
    }

    /// Name of the bound interface on that device, if any
    pub fn bound_interface(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.iface.as_str())
    }
}

/// A multiplexing switch with a fixed array of numbered ports
pub struct Switch {
    config: FabricConfig,
    ports: Vec<SwitchPort>,
}

impl Switch {
    pub fn new() -> Self {
        Switch::with_config(FabricConfig::default())
    }

    pub fn with_config(config: FabricConfig) -> Self {
        let ports = (1..=config.max_ports)
            .map(|number| SwitchPort::new(number, &config))
            .collect();
        Switch { config, ports }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn max_ports(&self) -> usize {
        self.config.max_ports
    }

    /// The port with the given number, for inspection
    pub fn port(&self, port_number: usize) -> Option<&SwitchPort> {
        if self.in_range(port_number) {
            Some(&self.ports[port_number - 1])
        } else {
            None
        }
    }

    /// Ports in numbering order
    pub fn ports(&self) -> impl Iterator<Item = &SwitchPort> {
        self.ports.iter()
    }

    /// Bind `device`'s interface `iface_name` to a port.
    ///
    /// A port already bound to a different device or interface refuses the
    /// binding unless `force` is set, in which case the previous occupant's
    /// interface is disconnected before the new binding lands. Rebinding
    /// the identical device and interface is an idempotent success. On
    /// success the device's own connection state is updated to mirror the
    /// fabric.
    pub fn connect<D>(
        &mut self,
        port_number: usize,
        device: &Rc<RefCell<D>>,
        iface_name: &str,
        force: bool,
    ) -> Result<(), SwitchError>
    where
        D: Endpoint + 'static,
    {
        let handle: Rc<RefCell<dyn Endpoint>> = device.clone();

        if !self.in_range(port_number) {
            return Err(SwitchError::PortOutOfRange {
                port: port_number,
                max: self.config.max_ports,
            });
        }

        let kind = handle.borrow().kind();
        if kind != DeviceKind::Computer {
            return Err(SwitchError::UnsupportedDeviceType { kind });
        }

        let index = port_number - 1;
        if let Some(binding) = self.ports[index].binding.as_ref() {
            let same_binding =
                Weak::ptr_eq(&binding.device, &Rc::downgrade(&handle)) && binding.iface == iface_name;
            if same_binding {
                debug!(
                    "{}: port {} already bound to {} ({}), nothing to do",
                    self.config.name, port_number, binding.device_name, binding.iface
                );
                return Ok(());
            }
            if !force {
                return Err(SwitchError::PortAlreadyConnected {
                    port_name: self.ports[index].port_name.clone(),
                });
            }
            // The displaced occupant is told first, so no device keeps
            // believing it is connected to a port that no longer reflects it
            warn!(
                "{}: displacing {} ({}) from port {}",
                self.config.name, binding.device_name, binding.iface, port_number
            );
            match binding.device.upgrade() {
                Some(previous) => previous.borrow_mut().disconnect_interface(&binding.iface),
                None => warn!(
                    "{}: previous occupant of port {} is gone",
                    self.config.name, port_number
                ),
            }
        }

        let device_name = handle.borrow().endpoint_name().to_string();
        self.ports[index].binding = Some(PortBinding {
            device: Rc::downgrade(&handle),
            device_name: device_name.clone(),
            iface: iface_name.to_string(),
        });
        handle.borrow_mut().connect_interface(
            iface_name,
            PeerRef {
                fabric: self.config.name.clone(),
                port: port_number,
            },
        );
        info!(
            "{}: port {} bound to {} ({})",
            self.config.name, port_number, device_name, iface_name
        );
        Ok(())
    }

    /// Unbind a port, notifying the bound device, and reset the port to its
    /// defaults. Out-of-range and unbound ports are tolerated as no-ops.
    pub fn disconnect(&mut self, port_number: usize) {
        if !self.in_range(port_number) {
            debug!(
                "{}: disconnect of out-of-range port {} ignored",
                self.config.name, port_number
            );
            return;
        }

        let index = port_number - 1;
        if let Some(binding) = self.ports[index].binding.take() {
            match binding.device.upgrade() {
                Some(device) => device.borrow_mut().disconnect_interface(&binding.iface),
                None => warn!(
                    "{}: occupant of port {} is gone, clearing the binding only",
                    self.config.name, port_number
                ),
            }
            self.ports[index] = SwitchPort::new(port_number, &self.config);
            info!(
                "{}: port {} unbound from {} ({})",
                self.config.name, port_number, binding.device_name, binding.iface
            );
        }
    }

    /// Assign a VLAN id to a port
    pub fn set_port_vlan(&mut self, port_number: usize, vlan_id: u16) -> Result<(), SwitchError> {
        if !self.in_range(port_number) {
            return Err(SwitchError::PortOutOfRange {
                port: port_number,
                max: self.config.max_ports,
            });
        }
        self.ports[port_number - 1].vlan_id = vlan_id;
        Ok(())
    }

    fn in_range(&self, port_number: usize) -> bool {
        (1..=self.config.max_ports).contains(&port_number)
    }
}

impl Default for Switch {
    fn default() -> Self {
        Switch::new()
    }
}
